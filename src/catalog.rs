//! Segment catalog: cluster label names and the strategic roadmap copy
//!
//! The catalog is built once at startup and handed to every component by
//! reference. It never changes while the dashboard runs.

use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Insight and strategy text shown for a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub insight: String,
    pub strategy: String,
}

/// One label→name assignment together with its roadmap text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDefinition {
    pub label: i64,
    pub name: String,
    #[serde(default)]
    pub insight: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    best_label: i64,
    segments: Vec<SegmentDefinition>,
}

/// Immutable lookup tables for segment naming and strategy copy
#[derive(Debug, Clone)]
pub struct SegmentCatalog {
    names: BTreeMap<i64, String>,
    best_label: i64,
    roadmap: HashMap<String, StrategyEntry>,
}

impl SegmentCatalog {
    /// Build a catalog from explicit definitions.
    ///
    /// Fails when two labels share a name, a label appears twice, or the
    /// best-segment label has no definition.
    pub fn new(best_label: i64, segments: Vec<SegmentDefinition>) -> DashboardResult<Self> {
        let mut names = BTreeMap::new();
        let mut seen_names = HashSet::new();
        let mut roadmap = HashMap::new();

        for segment in segments {
            if !seen_names.insert(segment.name.clone()) {
                return Err(DashboardError::InvalidCatalog(format!(
                    "name '{}' is used by more than one label",
                    segment.name
                )));
            }
            if names.contains_key(&segment.label) {
                return Err(DashboardError::InvalidCatalog(format!(
                    "label {} is defined more than once",
                    segment.label
                )));
            }

            match (segment.insight, segment.strategy) {
                (Some(insight), Some(strategy)) => {
                    roadmap.insert(segment.name.clone(), StrategyEntry { insight, strategy });
                }
                (None, None) => {}
                _ => {
                    return Err(DashboardError::InvalidCatalog(format!(
                        "segment '{}' must define both insight and strategy, or neither",
                        segment.name
                    )));
                }
            }
            names.insert(segment.label, segment.name);
        }

        if !names.contains_key(&best_label) {
            return Err(DashboardError::InvalidCatalog(format!(
                "best label {} has no segment definition",
                best_label
            )));
        }

        Ok(Self {
            names,
            best_label,
            roadmap,
        })
    }

    /// Load a catalog override from a JSON file
    pub fn from_json_file(path: &Path) -> DashboardResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> DashboardResult<Self> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        Self::new(file.best_label, file.segments)
    }

    /// Display name for a cluster label; unmapped labels get `Cluster <label>`
    pub fn name_for(&self, label: i64) -> String {
        self.names
            .get(&label)
            .cloned()
            .unwrap_or_else(|| format!("Cluster {}", label))
    }

    pub fn is_mapped(&self, label: i64) -> bool {
        self.names.contains_key(&label)
    }

    /// Name of the segment whose share is reported as a KPI
    pub fn best_name(&self) -> String {
        self.name_for(self.best_label)
    }

    pub fn strategy_for(&self, name: &str) -> Option<&StrategyEntry> {
        self.roadmap.get(name)
    }

    pub fn labels(&self) -> impl Iterator<Item = i64> + '_ {
        self.names.keys().copied()
    }
}

impl Default for SegmentCatalog {
    fn default() -> Self {
        let segments = vec![
            SegmentDefinition {
                label: 0,
                name: "0 - Best Customers 🏆".to_string(),
                insight: Some(
                    "Highly engaged, driving the majority of revenue with very recent purchases \
                     and high Monetary value. Their metrics are significantly above the global average."
                        .to_string(),
                ),
                strategy: Some(
                    "Retention & Reward. Implement an exclusive VIP loyalty tier offering early \
                     access to sales and dedicated support. Goal: Maximize Lifetime Value (LTV) \
                     and solidify high purchase frequency."
                        .to_string(),
                ),
            },
            SegmentDefinition {
                label: 2,
                name: "2 - Growing Customers 📈".to_string(),
                insight: Some(
                    "These customers are the largest segment. They are recent buyers but their \
                     Frequency is currently moderate. They are prime candidates for long-term growth."
                        .to_string(),
                ),
                strategy: Some(
                    "Habit Formation & Conversion. Design targeted email automation campaigns \
                     focused on increasing purchase cadence. Use personalized product \
                     recommendations and small incentives to drive the second/third purchase."
                        .to_string(),
                ),
            },
            SegmentDefinition {
                label: 1,
                name: "1 - Hibernating Customers 💤".to_string(),
                insight: Some(
                    "Highly lapsed (average of ≈ 1 year since last purchase) and lowest spending. \
                     This segment is costly to market to with the lowest expected return."
                        .to_string(),
                ),
                strategy: Some(
                    "Selective Win-Back. Deploy a single, highly aggressive, last-chance offer \
                     (e.g., 25% off + free shipping) to a fraction of this segment. If they fail \
                     to re-engage, tag them as dormant to save marketing budget."
                        .to_string(),
                ),
            },
        ];

        // The built-in table is known to be consistent.
        match Self::new(0, segments) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in segment catalog is invalid: {}", e),
        }
    }
}

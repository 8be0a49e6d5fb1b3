//! Segment selection and the strategic action plan panel

use crate::catalog::SegmentCatalog;
use crate::data::ClusterSummaryRecord;
use crate::error::{DashboardError, DashboardResult};

/// Shown for segments the catalog names by fallback only
pub const NO_STRATEGY_TEXT: &str = "No strategy defined for this segment.";

/// Text panel for the selected segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyView {
    pub segment: String,
    pub insight: String,
    pub strategy: String,
}

/// Single-choice control over the segments present in the summary
#[derive(Debug, Clone)]
pub struct StrategySelector<'a> {
    options: Vec<String>,
    catalog: &'a SegmentCatalog,
}

impl<'a> StrategySelector<'a> {
    /// Options are the distinct strategic names in summary order
    pub fn new(summary: &[ClusterSummaryRecord], catalog: &'a SegmentCatalog) -> Self {
        let mut options: Vec<String> = Vec::with_capacity(summary.len());
        for record in summary {
            if !options.contains(&record.strategic_name) {
                options.push(record.strategic_name.clone());
            }
        }
        Self { options, catalog }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// First option, if any
    pub fn default_selection(&self) -> Option<&str> {
        self.options.first().map(String::as_str)
    }

    /// Look up the panel text for `name`
    pub fn select(&self, name: &str) -> DashboardResult<StrategyView> {
        if !self.options.iter().any(|o| o == name) {
            return Err(DashboardError::UnknownSegment {
                name: name.to_string(),
                available: self.options.clone(),
            });
        }

        let view = match self.catalog.strategy_for(name) {
            Some(entry) => StrategyView {
                segment: name.to_string(),
                insight: entry.insight.clone(),
                strategy: entry.strategy.clone(),
            },
            None => StrategyView {
                segment: name.to_string(),
                insight: NO_STRATEGY_TEXT.to_string(),
                strategy: NO_STRATEGY_TEXT.to_string(),
            },
        };
        Ok(view)
    }

    /// Select `name`, or the default when `None`
    pub fn select_or_default(&self, name: Option<&str>) -> DashboardResult<StrategyView> {
        match name.or_else(|| self.default_selection()) {
            Some(name) => self.select(name),
            None => Err(DashboardError::EmptySummary),
        }
    }

    /// Resolve user input: an exact option, a cluster label, or a unique
    /// case-insensitive substring of an option
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if let Some(exact) = self.options.iter().find(|o| o.as_str() == input) {
            return Some(exact.as_str());
        }
        if let Ok(label) = input.parse::<i64>() {
            let name = self.catalog.name_for(label);
            return self.options.iter().find(|o| **o == name).map(String::as_str);
        }

        let needle = input.to_lowercase();
        let mut matches = self.options.iter().filter(|o| o.to_lowercase().contains(&needle));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only.as_str()),
            _ => None,
        }
    }
}

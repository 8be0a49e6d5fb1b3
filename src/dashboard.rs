//! The dashboard page: one full evaluation per interaction

use crate::cache::DatasetCache;
use crate::catalog::SegmentCatalog;
use crate::data::{DataPaths, Datasets};
use crate::error::DashboardError;
use crate::kpi::{compute_kpis, Kpis};
use crate::strategy::{StrategySelector, StrategyView};
use crate::table::{format_table, performance_table, TableRow};
use crate::viz::{proportion_slices, render_charts, ChartFiles, ProportionSlice, REFERENCE_LABEL};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const PAGE_TITLE: &str = "🛍️ E-commerce Customer Segmentation (UK Market)";
pub const STRATEGY_HEADER: &str = "🎯 Strategic Action Plan";
pub const PROPORTION_HEADER: &str = "Segment Size and Revenue Contribution";
pub const SNAKE_HEADER: &str = "RFM Metrics Comparison (The Snake Plot)";
pub const TABLE_HEADER: &str = "📊 Cluster Performance Data";

/// Shown when either input file is absent
pub const MISSING_FILES_MESSAGE: &str = "Error: Please ensure 'rfm_customer_segments.csv' and \
     'rfm_cluster_summary.csv' are in the same directory as the dashboard.";

const DIVIDER: &str = "---";

/// Load through the cache, turning a missing input file into empty datasets
/// plus the user-facing message. Every other failure propagates.
pub fn load_or_empty(
    cache: &mut DatasetCache,
    paths: &DataPaths,
    catalog: &SegmentCatalog,
) -> crate::Result<(Arc<Datasets>, Option<&'static str>)> {
    match cache.get_or_load(paths, catalog) {
        Ok(datasets) => Ok((datasets, None)),
        Err(DashboardError::MissingInput { path }) => {
            log::error!("Input file not found: {}", path.display());
            Ok((Arc::new(Datasets::empty()), Some(MISSING_FILES_MESSAGE)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Everything rendered below the title when data is available
#[derive(Debug, Clone)]
pub struct PageContent {
    pub kpis: Kpis,
    pub options: Vec<String>,
    pub strategy: StrategyView,
    pub slices: Vec<ProportionSlice>,
    pub charts: Option<ChartFiles>,
    pub table: Vec<TableRow>,
}

/// A fully evaluated page
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub error: Option<String>,
    pub content: Option<PageContent>,
}

impl DashboardPage {
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Resolved name of the segment shown in the strategy panel
    pub fn selected_segment(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.strategy.segment.as_str())
    }
}

impl fmt::Display for DashboardPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", PAGE_TITLE)?;
        writeln!(f, "{}", DIVIDER)?;

        if let Some(error) = &self.error {
            writeln!(f, "{}", error)?;
        }

        let Some(content) = &self.content else {
            if self.error.is_none() {
                writeln!(f, "No segment data available.")?;
            }
            return Ok(());
        };

        for card in content.kpis.cards() {
            writeln!(f, "  {:<30} {}", card.label, card.value)?;
        }
        writeln!(f, "{}", DIVIDER)?;

        writeln!(f, "\n{}", STRATEGY_HEADER)?;
        writeln!(f, "Segments: {}", content.options.join(" | "))?;
        writeln!(f, "\n{}", content.strategy.segment)?;
        writeln!(f, "Insight: {}", content.strategy.insight)?;
        writeln!(f, "Strategy: {}", content.strategy.strategy)?;
        writeln!(f, "{}", DIVIDER)?;

        writeln!(f, "\n{}", PROPORTION_HEADER)?;
        let total: f64 = content.slices.iter().map(|s| s.percentage).sum();
        for slice in &content.slices {
            writeln!(f, "  {:<32} {:>6.2}%", slice.segment, slice.share(total))?;
        }
        if let Some(charts) = &content.charts {
            writeln!(f, "  Chart: {}", charts.proportions.display())?;
            writeln!(f, "\n{}", SNAKE_HEADER)?;
            writeln!(f, "  Chart: {} (reference line: {})", charts.snake.display(), REFERENCE_LABEL)?;
        }

        writeln!(f, "\n{}", TABLE_HEADER)?;
        write!(f, "{}", format_table(&content.table))
    }
}

/// Options for the segment selection control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    pub options: Vec<String>,
    pub error: Option<&'static str>,
}

/// Dashboard state that survives between interactions: inputs, catalog, cache
#[derive(Debug)]
pub struct Dashboard {
    paths: DataPaths,
    catalog: SegmentCatalog,
    chart_dir: Option<PathBuf>,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(paths: DataPaths, catalog: SegmentCatalog) -> Self {
        Self {
            paths,
            catalog,
            chart_dir: None,
            cache: DatasetCache::new(),
        }
    }

    /// Write chart PNGs into `dir` on every render
    pub fn with_chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(dir.into());
        self
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Selectable segments, plus the missing-file message when no data
    /// could be loaded
    pub fn segment_options(&mut self) -> crate::Result<SegmentOptions> {
        let (datasets, error) = load_or_empty(&mut self.cache, &self.paths, &self.catalog)?;
        let selector = StrategySelector::new(&datasets.summary, &self.catalog);
        Ok(SegmentOptions {
            options: selector.options().to_vec(),
            error,
        })
    }

    /// Like `render`, but a selection that no longer matches any segment
    /// falls back to the first one instead of failing
    pub fn render_or_default(&mut self, selection: Option<&str>) -> crate::Result<DashboardPage> {
        match self.render(selection) {
            Err(e) if matches!(e.downcast_ref::<DashboardError>(), Some(DashboardError::UnknownSegment { .. })) => {
                log::warn!("{}; showing the default segment", e);
                self.render(None)
            }
            result => result,
        }
    }

    /// Evaluate the whole page for `selection`
    ///
    /// `selection` may be an exact segment name, a cluster label or a unique
    /// substring of a name; `None` selects the first segment.
    pub fn render(&mut self, selection: Option<&str>) -> crate::Result<DashboardPage> {
        let (datasets, error) = load_or_empty(&mut self.cache, &self.paths, &self.catalog)?;

        if datasets.is_empty() {
            return Ok(DashboardPage {
                error: error.map(str::to_string),
                content: None,
            });
        }

        let kpis = compute_kpis(&datasets, &self.catalog)?;

        let selector = StrategySelector::new(&datasets.summary, &self.catalog);
        let resolved = match selection {
            Some(input) => Some(selector.resolve(input).ok_or_else(|| DashboardError::UnknownSegment {
                name: input.to_string(),
                available: selector.options().to_vec(),
            })?),
            None => None,
        };
        let strategy = selector.select_or_default(resolved)?;

        let charts = match &self.chart_dir {
            Some(dir) => Some(render_charts(&datasets.summary, dir)?),
            None => None,
        };

        Ok(DashboardPage {
            error: None,
            content: Some(PageContent {
                kpis,
                options: selector.options().to_vec(),
                strategy,
                slices: proportion_slices(&datasets.summary),
                charts,
                table: performance_table(&datasets.summary),
            }),
        })
    }
}

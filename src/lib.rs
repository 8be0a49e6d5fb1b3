//! rfm-dashboard: a read-only dashboard over RFM customer segmentation results
//!
//! This library loads precomputed per-customer segment assignments and
//! per-cluster summaries, derives headline KPIs, maps segments to strategic
//! action text and renders charts and a performance table.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod kpi;
pub mod strategy;
pub mod table;
pub mod viz;

// Re-export public items for easier access
pub use cache::DatasetCache;
pub use catalog::{SegmentCatalog, StrategyEntry};
pub use cli::Args;
pub use dashboard::{load_or_empty, Dashboard, DashboardPage, SegmentOptions};
pub use data::{load_datasets, ClusterSummaryRecord, CustomerSegmentRecord, DataPaths, Datasets};
pub use error::DashboardError;
pub use kpi::{compute_kpis, Kpis};
pub use strategy::{StrategySelector, StrategyView};
pub use table::performance_table;
pub use viz::{proportion_slices, render_charts, snake_plot_data};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

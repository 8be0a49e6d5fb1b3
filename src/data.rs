//! Loading of precomputed segmentation results using Polars

use crate::catalog::SegmentCatalog;
use crate::error::{DashboardError, DashboardResult};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default file holding one row per customer with its cluster label
pub const DEFAULT_SEGMENTS_FILE: &str = "rfm_customer_segments.csv";
/// Default file holding one row per cluster with mean RFM values
pub const DEFAULT_SUMMARY_FILE: &str = "rfm_cluster_summary.csv";

const CUSTOMER_COLUMNS: [&str; 5] = ["Customer ID", "Recency", "Frequency", "Monetary", "Cluster_Label"];
const SUMMARY_COLUMNS: [&str; 6] = [
    "Cluster_Label",
    "Recency_Mean",
    "Frequency_Mean",
    "Monetary_Mean",
    "Count",
    "Percentage",
];

/// Locations of the two input tables
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPaths {
    pub segments: PathBuf,
    pub summary: PathBuf,
}

impl DataPaths {
    pub fn new(segments: impl Into<PathBuf>, summary: impl Into<PathBuf>) -> Self {
        Self {
            segments: segments.into(),
            summary: summary.into(),
        }
    }

    /// Both default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_SEGMENTS_FILE), dir.join(DEFAULT_SUMMARY_FILE))
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENTS_FILE, DEFAULT_SUMMARY_FILE)
    }
}

/// One customer with its RFM metrics and assigned segment
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSegmentRecord {
    pub customer_id: String,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
    pub cluster_label: i64,
    pub strategic_name: String,
}

/// Aggregated statistics for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummaryRecord {
    pub cluster_label: i64,
    pub recency_mean: f64,
    pub frequency_mean: f64,
    pub monetary_mean: f64,
    pub count: i64,
    pub percentage: f64,
    pub strategic_name: String,
}

/// The two loaded tables. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub customers: Vec<CustomerSegmentRecord>,
    pub summary: Vec<ClusterSummaryRecord>,
}

impl Datasets {
    /// The "no data available" value
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() || self.summary.is_empty()
    }

    /// Labels found in either table that the catalog does not name
    pub fn unmapped_labels(&self, catalog: &SegmentCatalog) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.customers
            .iter()
            .map(|c| c.cluster_label)
            .chain(self.summary.iter().map(|s| s.cluster_label))
            .filter(|&label| !catalog.is_mapped(label) && seen.insert(label))
            .collect()
    }
}

/// Load both tables and attach the strategic name to every row
///
/// # Arguments
/// * `paths` - Locations of the customer and summary CSV files
/// * `catalog` - Label naming used for both tables
///
/// # Returns
/// * `Datasets`, or `DashboardError::MissingInput` naming the first absent file
pub fn load_datasets(paths: &DataPaths, catalog: &SegmentCatalog) -> DashboardResult<Datasets> {
    for path in [&paths.segments, &paths.summary] {
        if !path.is_file() {
            return Err(DashboardError::MissingInput { path: path.clone() });
        }
    }

    let customers = load_customer_segments(&paths.segments, catalog)?;
    let summary = load_cluster_summary(&paths.summary, catalog)?;

    log::debug!(
        "Loaded {} customer rows from {} and {} cluster rows from {}",
        customers.len(),
        paths.segments.display(),
        summary.len(),
        paths.summary.display()
    );

    let datasets = Datasets { customers, summary };
    let unmapped = datasets.unmapped_labels(catalog);
    if !unmapped.is_empty() {
        log::warn!("Cluster labels without a catalog name: {:?}", unmapped);
    }

    Ok(datasets)
}

/// Read the customer-level table
pub fn load_customer_segments(
    path: &Path,
    catalog: &SegmentCatalog,
) -> DashboardResult<Vec<CustomerSegmentRecord>> {
    let df = read_columns(path, &CUSTOMER_COLUMNS)?;

    let ids = string_column(&df, "Customer ID", path)?;
    let recency = f64_column(&df, "Recency", path)?;
    let frequency = f64_column(&df, "Frequency", path)?;
    let monetary = f64_column(&df, "Monetary", path)?;
    let labels = i64_column(&df, "Cluster_Label", path)?;

    let records = ids
        .into_iter()
        .enumerate()
        .map(|(i, customer_id)| CustomerSegmentRecord {
            customer_id,
            recency: recency[i],
            frequency: frequency[i],
            monetary: monetary[i],
            cluster_label: labels[i],
            strategic_name: catalog.name_for(labels[i]),
        })
        .collect();

    Ok(records)
}

/// Read the cluster-level table, keeping file order
pub fn load_cluster_summary(
    path: &Path,
    catalog: &SegmentCatalog,
) -> DashboardResult<Vec<ClusterSummaryRecord>> {
    let df = read_columns(path, &SUMMARY_COLUMNS)?;

    let labels = i64_column(&df, "Cluster_Label", path)?;
    let recency = f64_column(&df, "Recency_Mean", path)?;
    let frequency = f64_column(&df, "Frequency_Mean", path)?;
    let monetary = f64_column(&df, "Monetary_Mean", path)?;
    let counts = i64_column(&df, "Count", path)?;
    let percentages = f64_column(&df, "Percentage", path)?;

    let records = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| ClusterSummaryRecord {
            cluster_label: label,
            recency_mean: recency[i],
            frequency_mean: frequency[i],
            monetary_mean: monetary[i],
            count: counts[i],
            percentage: percentages[i],
            strategic_name: catalog.name_for(label),
        })
        .collect();

    Ok(records)
}

/// Scan a CSV with a header row and keep only `columns`
fn read_columns(path: &Path, columns: &[&str]) -> DashboardResult<DataFrame> {
    let selection: Vec<Expr> = columns.iter().map(|&name| col(name)).collect();

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .select(selection)
        .collect()?;

    Ok(df)
}

fn invalid_column(column: &str, path: &Path) -> DashboardError {
    DashboardError::InvalidColumn {
        column: column.to_string(),
        path: path.to_path_buf(),
    }
}

fn f64_column(df: &DataFrame, name: &str, path: &Path) -> DashboardResult<Vec<f64>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|value| value.ok_or_else(|| invalid_column(name, path)))
        .collect::<DashboardResult<Vec<f64>>>()?;
    Ok(values)
}

fn i64_column(df: &DataFrame, name: &str, path: &Path) -> DashboardResult<Vec<i64>> {
    let series = df.column(name)?.cast(&DataType::Int64)?;
    let values = series
        .i64()?
        .into_iter()
        .map(|value| value.ok_or_else(|| invalid_column(name, path)))
        .collect::<DashboardResult<Vec<i64>>>()?;
    Ok(values)
}

fn string_column(df: &DataFrame, name: &str, path: &Path) -> DashboardResult<Vec<String>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|value| {
            value
                .map(str::to_string)
                .ok_or_else(|| invalid_column(name, path))
        })
        .collect::<DashboardResult<Vec<String>>>()?;
    Ok(values)
}

//! Typed failures raised by the dashboard library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Required input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Segment '{name}' is not present in the cluster summary")]
    MissingSegment { name: String },

    #[error("Unknown segment '{name}'; available: {}", available.join(", "))]
    UnknownSegment { name: String, available: Vec<String> },

    #[error("Invalid segment catalog: {0}")]
    InvalidCatalog(String),

    #[error("Cluster summary is empty")]
    EmptySummary,

    #[error("Column '{column}' in {} has a missing or invalid value", path.display())]
    InvalidColumn { column: String, path: PathBuf },

    #[error("CSV error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

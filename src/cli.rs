//! Command-line interface definitions and argument parsing

use crate::catalog::SegmentCatalog;
use crate::data::{DataPaths, DEFAULT_SEGMENTS_FILE, DEFAULT_SUMMARY_FILE};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Terminal dashboard over precomputed RFM customer segments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the customer-level segment CSV
    #[arg(long, default_value = DEFAULT_SEGMENTS_FILE)]
    pub segments: PathBuf,

    /// Path to the cluster summary CSV
    #[arg(long, default_value = DEFAULT_SUMMARY_FILE)]
    pub summary: PathBuf,

    /// Segment to show in the strategy panel: full name, cluster label or
    /// a unique part of the name. Defaults to the first segment.
    #[arg(short, long)]
    pub segment: Option<String>,

    /// Directory the chart PNGs are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON file overriding segment names and strategy text
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print the selectable segments and exit
    #[arg(long)]
    pub list_segments: bool,

    /// Read segment selections from stdin and re-render after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn data_paths(&self) -> DataPaths {
        DataPaths::new(&self.segments, &self.summary)
    }

    /// The built-in catalog, or the one named by `--catalog`
    pub fn load_catalog(&self) -> crate::Result<SegmentCatalog> {
        match &self.catalog {
            Some(path) => SegmentCatalog::from_json_file(path)
                .with_context(|| format!("Failed to load segment catalog from {}", path.display())),
            None => Ok(SegmentCatalog::default()),
        }
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["rfm-dashboard"]);
        assert_eq!(args.segments, PathBuf::from("rfm_customer_segments.csv"));
        assert_eq!(args.summary, PathBuf::from("rfm_cluster_summary.csv"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(args.segment.is_none());
        assert!(!args.interactive);
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "rfm-dashboard",
            "--segments",
            "data/customers.csv",
            "--summary",
            "data/clusters.csv",
            "-s",
            "growing",
            "-o",
            "charts",
            "-v",
        ]);
        assert_eq!(args.data_paths(), DataPaths::new("data/customers.csv", "data/clusters.csv"));
        assert_eq!(args.segment.as_deref(), Some("growing"));
        assert_eq!(args.output_dir, PathBuf::from("charts"));
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_load_catalog() {
        let mut args = Args::parse_from(["rfm-dashboard"]);
        assert_eq!(args.load_catalog().unwrap().best_name(), "0 - Best Customers 🏆");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"best_label": 3, "segments": [{{"label": 3, "name": "Whales"}}]}}"#).unwrap();
        args.catalog = Some(file.path().to_path_buf());
        assert_eq!(args.load_catalog().unwrap().best_name(), "Whales");

        args.catalog = Some(PathBuf::from("does/not/exist.json"));
        assert!(args.load_catalog().is_err());
    }
}

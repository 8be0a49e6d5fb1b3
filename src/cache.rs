//! Memoized dataset loading keyed on input paths and modification times

use crate::catalog::SegmentCatalog;
use crate::data::{load_datasets, DataPaths, Datasets};
use crate::error::DashboardResult;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Cache key: both paths plus the mtimes observed when the entry was loaded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    paths: DataPaths,
    segments_modified: Option<SystemTime>,
    summary_modified: Option<SystemTime>,
}

impl CacheKey {
    fn for_paths(paths: &DataPaths) -> Self {
        Self {
            paths: paths.clone(),
            segments_modified: modified_time(&paths.segments),
            summary_modified: modified_time(&paths.summary),
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Read-only datasets shared between re-renders
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Arc<Datasets>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached datasets for `paths`, loading them on a miss.
    ///
    /// Failed loads are not stored, so a missing file is retried on the
    /// next call.
    pub fn get_or_load(
        &mut self,
        paths: &DataPaths,
        catalog: &SegmentCatalog,
    ) -> DashboardResult<Arc<Datasets>> {
        let key = CacheKey::for_paths(paths);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", paths.summary.display());
            return Ok(Arc::clone(hit));
        }

        log::debug!("Dataset cache miss for {}", paths.summary.display());
        let datasets = Arc::new(load_datasets(paths, catalog)?);
        self.loads += 1;

        // Entries for older mtimes of the same files can never hit again.
        self.entries.retain(|k, _| k.paths != key.paths);
        self.entries.insert(key, Arc::clone(&datasets));
        Ok(datasets)
    }

    /// Drop every cached entry
    pub fn clear(&mut self) {
        log::info!("Clearing {} cached dataset(s)", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of loads that actually read from disk
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

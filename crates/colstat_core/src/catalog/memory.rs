use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use colstat_error::{Result, ResultExt};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use super::{ColumnRef, HistogramStore};
use crate::histogram::Histogram;

/// In-memory histogram store holding every analyzed version of each column's
/// histogram.
#[derive(Debug, Default)]
pub struct MemoryHistogramStore {
    /// Versions ordered by analyze time, oldest first.
    histograms: RwLock<HashMap<ColumnRef, Vec<Arc<Histogram>>>>,
}

#[derive(Debug, Deserialize)]
struct HistogramEntry {
    column: ColumnRef,
    histogram: Histogram,
}

impl MemoryHistogramStore {
    /// Create a store from a json list of `{"column": ..., "histogram": ...}`
    /// entries.
    pub fn load_json(s: &str) -> Result<Self> {
        let entries: Vec<HistogramEntry> =
            serde_json::from_str(s).context("Failed to parse histogram store json")?;

        let store = Self::default();
        for entry in entries {
            store.put(entry.column, entry.histogram)?;
        }

        Ok(store)
    }

    /// Add a new version of a column's histogram.
    pub fn put(&self, column: ColumnRef, histogram: Histogram) -> Result<()> {
        histogram.validate()?;
        debug!(%column, analyze_time = %histogram.analyze_time, "adding histogram");

        let mut histograms = self.histograms.write();
        let versions = histograms.entry(column).or_default();
        let idx = versions.partition_point(|h| h.analyze_time <= histogram.analyze_time);
        versions.insert(idx, Arc::new(histogram));

        Ok(())
    }

    /// Remove all versions of a column's histogram, returning the number of
    /// versions removed.
    pub fn remove(&self, column: &ColumnRef) -> usize {
        self.histograms
            .write()
            .remove(column)
            .map(|versions| versions.len())
            .unwrap_or(0)
    }

    pub fn num_versions(&self, column: &ColumnRef) -> usize {
        self.histograms
            .read()
            .get(column)
            .map(|versions| versions.len())
            .unwrap_or(0)
    }
}

impl HistogramStore for MemoryHistogramStore {
    fn get_histogram(
        &self,
        column: &ColumnRef,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<Arc<Histogram>>> {
        let histograms = self.histograms.read();
        let versions = match histograms.get(column) {
            Some(versions) => versions,
            None => return Ok(None),
        };

        let hist = match as_of {
            Some(as_of) => {
                let idx = versions.partition_point(|h| h.analyze_time <= as_of);
                idx.checked_sub(1).map(|idx| versions[idx].clone())
            }
            None => versions.last().cloned(),
        };

        Ok(hist)
    }
}

pub mod memory;

use std::fmt::{self, Debug};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use colstat_error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::histogram::Histogram;
use crate::sarg::SearchRangeSequence;
use crate::statistics::estimate::{ColumnStatistics, HistogramEstimator};

/// Identifies a single column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Source of collected column histograms.
pub trait HistogramStore: Debug + Send + Sync {
    /// Get the histogram for a column.
    ///
    /// `as_of` selects the statistics that were current at a point in time.
    /// None selects the latest statistics.
    fn get_histogram(
        &self,
        column: &ColumnRef,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<Arc<Histogram>>>;
}

/// Statistics for the columns of a single table.
#[derive(Debug, Clone)]
pub struct TableStatistics {
    /// Total rows in the table, if known.
    pub row_count: Option<u64>,
    pub store: Arc<dyn HistogramStore>,
    pub as_of: Option<DateTime<Utc>>,
    pub estimator: HistogramEstimator,
}

impl TableStatistics {
    pub fn new(store: Arc<dyn HistogramStore>) -> Self {
        TableStatistics {
            row_count: None,
            store,
            as_of: None,
            estimator: HistogramEstimator::default(),
        }
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn with_estimator(mut self, estimator: HistogramEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Estimate the statistics of `column` restricted to `ranges`.
    ///
    /// None for `ranges` means the column isn't filtered.
    pub fn column_statistics(
        &self,
        column: &ColumnRef,
        ranges: Option<&SearchRangeSequence>,
    ) -> Result<ColumnStatistics> {
        let histogram = self.store.get_histogram(column, self.as_of)?;
        if histogram.is_none() {
            debug!(%column, "no histogram for column");
        }

        self.estimator.evaluate(histogram.as_deref(), ranges)
    }

    /// Estimated number of rows in the table matching `ranges` on `column`.
    pub fn estimated_row_count(
        &self,
        column: &ColumnRef,
        ranges: Option<&SearchRangeSequence>,
    ) -> Result<Option<f64>> {
        let row_count = match self.row_count {
            Some(count) => count,
            None => return Ok(None),
        };
        let stats = self.column_statistics(column, ranges)?;
        Ok(stats.estimated_row_count(row_count))
    }
}

//! Per-column value distribution histograms.
//!
//! A histogram is a read-only snapshot produced by the statistics collection
//! pipeline. Buckets are ordered by non-decreasing starting value. A bucket
//! spans from its starting value up to the starting value of the next
//! bucket, the last bucket has no upper extent.

use chrono::{DateTime, Utc};
use colstat_error::{DbError, Result, ResultExt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Smallest value this bucket may contain, as a string.
    ///
    /// None represents null, which sorts before all other values.
    pub starting_value: Option<String>,
    /// Number of distinct values in the sample that landed in this bucket.
    ///
    /// Always a lower bound for the true distinct count of the bucket.
    pub sampled_distinct_count: u64,
}

impl Bucket {
    pub fn new(starting_value: impl Into<String>, sampled_distinct_count: u64) -> Self {
        Bucket {
            starting_value: Some(starting_value.into()),
            sampled_distinct_count,
        }
    }

    /// Bucket starting at null.
    pub fn null(sampled_distinct_count: u64) -> Self {
        Bucket {
            starting_value: None,
            sampled_distinct_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// When the statistics were collected.
    pub analyze_time: DateTime<Utc>,
    /// Estimated distinct values for the whole column, if known.
    pub distinct_value_count: Option<u64>,
    /// Percentage of rows sampled when building the histogram.
    pub percentage_sampled: u32,
    /// Declared number of buckets. Must equal `buckets.len()`.
    pub bucket_count: usize,
    /// Number of rows summarized by each bucket.
    pub rows_per_bucket: u64,
    /// Number of rows summarized by the last bucket. May be less than
    /// `rows_per_bucket`.
    pub rows_last_bucket: u64,
    pub buckets: Vec<Bucket>,
}

impl Histogram {
    /// Create a fully sampled histogram with a bucket count matching the
    /// provided buckets.
    pub fn new(
        analyze_time: DateTime<Utc>,
        distinct_value_count: Option<u64>,
        rows_per_bucket: u64,
        rows_last_bucket: u64,
        buckets: Vec<Bucket>,
    ) -> Self {
        Histogram {
            analyze_time,
            distinct_value_count,
            percentage_sampled: 100,
            bucket_count: buckets.len(),
            rows_per_bucket,
            rows_last_bucket,
            buckets,
        }
    }

    pub fn with_percentage_sampled(mut self, percentage: u32) -> Self {
        self.percentage_sampled = percentage;
        self
    }

    /// Check the internal consistency of the histogram.
    ///
    /// A mismatch between the declared and actual bucket count means the
    /// histogram was corrupted upstream and can't be used.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count != self.buckets.len() {
            return Err(DbError::new("Invalid histogram bucket count")
                .with_field("declared", self.bucket_count)
                .with_field("actual", self.buckets.len()));
        }
        Ok(())
    }

    /// Sum of the sampled distinct counts across all buckets.
    pub fn sampled_distinct_total(&self) -> u64 {
        self.buckets
            .iter()
            .map(|b| b.sampled_distinct_count)
            .sum()
    }

    /// Read a histogram from json, validating it.
    pub fn from_json(s: &str) -> Result<Self> {
        let hist: Histogram = serde_json::from_str(s).context("Failed to parse histogram json")?;
        hist.validate()?;
        Ok(hist)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize histogram")
    }
}

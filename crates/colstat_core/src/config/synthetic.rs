use serde::{Deserialize, Serialize};

/// Default number of buckets for generated histograms.
pub const DEFAULT_HISTOGRAM_BUCKET_COUNT: usize = 100;

/// Configuration for generating synthetic histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticHistogramConfig {
    /// Upper limit on the number of buckets generated.
    pub max_bucket_count: usize,
}

impl Default for SyntheticHistogramConfig {
    fn default() -> Self {
        SyntheticHistogramConfig {
            max_bucket_count: DEFAULT_HISTOGRAM_BUCKET_COUNT,
        }
    }
}

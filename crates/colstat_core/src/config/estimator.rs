use serde::{Deserialize, Serialize};

/// Fraction to use for a bucket that no range touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBucketFraction {
    /// The bucket contributes nothing to selectivity.
    #[default]
    Zero,
    /// The bucket's fraction is unknown, making overall selectivity unknown.
    Unknown,
}

/// Configuration for histogram based estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub empty_bucket_fraction: EmptyBucketFraction,
}

//! Histogram based selectivity and cardinality estimates for a single column.

use colstat_error::Result;
use tracing::{debug, error, trace, warn};

use super::coverage::HistogramCoverage;
use super::locate::locate_range;
use super::value::StatisticsValue;
use crate::config::estimator::EstimatorConfig;
use crate::histogram::Histogram;
use crate::sarg::SearchRangeSequence;

/// Result of applying a predicate to a column's histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStatistics {
    /// Fraction of rows matching the predicate.
    pub selectivity: StatisticsValue<f64>,
    /// Number of distinct values matching the predicate.
    pub cardinality: StatisticsValue<f64>,
}

impl ColumnStatistics {
    pub const UNKNOWN: Self = ColumnStatistics {
        selectivity: StatisticsValue::Unknown,
        cardinality: StatisticsValue::Unknown,
    };

    pub fn selectivity(&self) -> Option<f64> {
        self.selectivity.get()
    }

    pub fn cardinality(&self) -> Option<f64> {
        self.cardinality.get()
    }

    /// Estimated number of rows matching the predicate out of `row_count`
    /// total rows.
    pub fn estimated_row_count(&self, row_count: u64) -> Option<f64> {
        self.selectivity().map(|sel| sel * row_count as f64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistogramEstimator {
    config: EstimatorConfig,
}

impl HistogramEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        HistogramEstimator { config }
    }

    /// Estimate the selectivity and cardinality of `ranges` against a
    /// column's histogram.
    ///
    /// A missing histogram or a missing range sequence (no predicate) are
    /// both valid inputs. Anything preventing a sound estimate produces
    /// unknown values. The only error is a histogram that fails validation.
    pub fn evaluate(
        &self,
        histogram: Option<&Histogram>,
        ranges: Option<&SearchRangeSequence>,
    ) -> Result<ColumnStatistics> {
        let histogram = match histogram {
            Some(hist) => hist,
            None => return Ok(ColumnStatistics::UNKNOWN),
        };

        if let Err(e) = histogram.validate() {
            error!(%e, "corrupt histogram");
            return Err(e);
        }

        let distinct_count = match histogram.distinct_value_count {
            Some(count) => count,
            None => {
                let selectivity = match ranges {
                    Some(_) => StatisticsValue::Unknown,
                    None => StatisticsValue::Exact(1.0),
                };
                return Ok(ColumnStatistics {
                    selectivity,
                    cardinality: StatisticsValue::Unknown,
                });
            }
        };

        let ranges = match ranges {
            Some(ranges) => ranges,
            None => {
                return Ok(ColumnStatistics {
                    selectivity: StatisticsValue::Exact(1.0),
                    cardinality: StatisticsValue::Estimated(distinct_count as f64),
                });
            }
        };

        if !ranges.has_only_literal_bounds() {
            debug!(%ranges, "non-literal range bound, cannot use histogram");
            return Ok(ColumnStatistics::UNKNOWN);
        }

        if histogram.buckets.is_empty() {
            return Ok(ColumnStatistics::UNKNOWN);
        }

        let coverage = match compute_coverage(histogram, ranges) {
            Ok(coverage) => coverage,
            Err(e) => {
                warn!(%e, "failed to compute histogram coverage");
                return Ok(ColumnStatistics::UNKNOWN);
            }
        };

        let stats = self.read_coverage(histogram, distinct_count, &coverage);
        debug!(
            %ranges,
            selectivity = %stats.selectivity,
            cardinality = %stats.cardinality,
            "histogram estimate"
        );

        Ok(stats)
    }

    /// Combine per-bucket coverage into the final estimate.
    fn read_coverage(
        &self,
        histogram: &Histogram,
        distinct_count: u64,
        coverage: &HistogramCoverage,
    ) -> ColumnStatistics {
        // actual values = sampled values * correction
        //
        // Fully computed statistics have a correction of 1.0, sampled
        // statistics scale up.
        let sampled = histogram.sampled_distinct_total();
        if sampled > distinct_count {
            warn!(
                sampled,
                distinct_count, "histogram sampled more distinct values than the column has"
            );
        }
        let correction = if sampled == 0 {
            None
        } else {
            Some(distinct_count as f64 / sampled as f64)
        };

        let last_idx = histogram.buckets.len() - 1;
        let mut total_fraction = Some(0.0);
        let mut total_cardinality = Some(0.0);

        for (idx, (bucket, cov)) in histogram
            .buckets
            .iter()
            .zip(coverage.buckets())
            .enumerate()
        {
            let bucket_cardinality =
                correction.map(|correction| bucket.sampled_distinct_count as f64 * correction);

            let mut fraction =
                cov.estimate_fraction(bucket_cardinality, self.config.empty_bucket_fraction);
            // The last bucket may hold fewer rows than the others.
            if idx == last_idx && histogram.rows_per_bucket != 0 {
                let scale = histogram.rows_last_bucket as f64 / histogram.rows_per_bucket as f64;
                fraction = fraction.map(|f| f * scale);
            }
            let cardinality = cov.estimate_cardinality(bucket_cardinality);

            trace!(idx, ?cov, ?bucket_cardinality, ?fraction, ?cardinality, "bucket estimate");

            total_fraction = total_fraction.zip(fraction).map(|(a, b)| a + b);
            total_cardinality = total_cardinality.zip(cardinality).map(|(a, b)| a + b);
        }

        let num_buckets = histogram.buckets.len() as f64;

        ColumnStatistics {
            selectivity: match total_fraction {
                Some(total) => StatisticsValue::Estimated(total / num_buckets),
                None => StatisticsValue::Unknown,
            },
            cardinality: match total_cardinality {
                Some(total) => StatisticsValue::Estimated(total),
                None => StatisticsValue::Unknown,
            },
        }
    }
}

/// Locate each range and fold it into per-bucket coverage.
///
/// Each range's scan starts at the last bucket of the previous non-empty
/// range.
fn compute_coverage(
    histogram: &Histogram,
    ranges: &SearchRangeSequence,
) -> Result<HistogramCoverage> {
    let buckets = &histogram.buckets;
    let mut coverage = HistogramCoverage::new(buckets.len());

    let mut min_bucket = 0;
    for range in ranges.iter() {
        let span = locate_range(buckets, range, min_bucket)?;
        trace!(%range, ?span, "located range");

        let span = match span {
            Some(span) => span,
            None => continue,
        };

        let first_starting_value = buckets[span.first].starting_value.as_deref();
        coverage.add_range(range, Some(span), first_starting_value)?;
        min_bucket = span.last;
    }

    Ok(coverage)
}

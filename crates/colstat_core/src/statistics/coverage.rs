//! Per-bucket tallies of how a range sequence covers a histogram.
//!
//! Selectivity and cardinality are tallied separately. A point range that
//! spreads over several buckets (duplicate starting values) is a single
//! distinct value, so it only counts as a point for the cardinality of its
//! first bucket. For selectivity it counts as a range over every bucket it
//! touches.

use std::cmp::Ordering;

use colstat_error::Result;

use super::compare::compare_bucket_value;
use super::locate::BucketSpan;
use crate::config::estimator::EmptyBucketFraction;
use crate::sarg::{Endpoint, SearchRange};

/// Describes which points and ranges land on a single bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCoverage {
    /// The bucket is known to be fully contained in some range.
    pub entirely_covered: bool,
    pub cardinality_points: u32,
    pub cardinality_ranges: u32,
    pub selectivity_points: u32,
    pub selectivity_ranges: u32,
}

impl BucketCoverage {
    /// Estimate what fraction of the bucket's rows are covered.
    ///
    /// `bucket_cardinality` is the estimated distinct count of the bucket,
    /// None if it couldn't be estimated.
    pub fn estimate_fraction(
        &self,
        bucket_cardinality: Option<f64>,
        empty: EmptyBucketFraction,
    ) -> Option<f64> {
        if self.entirely_covered {
            return Some(1.0);
        }

        // Points alone need the bucket cardinality to mean anything.
        if bucket_cardinality.is_none() && self.selectivity_ranges == 0 {
            return None;
        }

        if self.selectivity_points == 0 && self.selectivity_ranges == 0 {
            return match empty {
                EmptyBucketFraction::Zero => Some(0.0),
                EmptyBucketFraction::Unknown => None,
            };
        }

        let mut fraction = 0.0;
        if let Some(cardinality) = bucket_cardinality {
            if self.selectivity_points > 0 {
                fraction = (self.selectivity_points as f64 / cardinality.max(1.0)).min(1.0);
            }
        }

        // Any range gets half of what's left.
        if self.selectivity_ranges > 0 {
            fraction += (1.0 - fraction) / 2.0;
        }

        Some(fraction)
    }

    /// Estimate the number of distinct values in the bucket matched by the
    /// predicate.
    pub fn estimate_cardinality(&self, bucket_cardinality: Option<f64>) -> Option<f64> {
        let points = self.cardinality_points as f64;
        if self.cardinality_ranges == 0 {
            return Some(points);
        }

        // Ranges need the bucket cardinality.
        let cardinality = bucket_cardinality?;
        if points > 0.0 && points >= cardinality {
            return Some(points);
        }

        // Entirely covered buckets count the whole bucket, other ranges get
        // half of the remaining values.
        let base = if self.entirely_covered {
            cardinality.max(points)
        } else {
            points
        };
        let remaining = (cardinality - base).max(0.0);

        Some(base + remaining / 2.0)
    }
}

/// Coverage state for every bucket of a histogram.
///
/// Created fresh for each estimate. Only ever accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramCoverage {
    buckets: Vec<BucketCoverage>,
}

impl HistogramCoverage {
    pub fn new(num_buckets: usize) -> Self {
        HistogramCoverage {
            buckets: vec![BucketCoverage::default(); num_buckets],
        }
    }

    pub fn buckets(&self) -> &[BucketCoverage] {
        &self.buckets
    }

    /// Tally a located range.
    ///
    /// `first_starting_value` is the starting value of the first bucket in
    /// `span`.
    pub fn add_range(
        &mut self,
        range: &SearchRange,
        span: Option<BucketSpan>,
        first_starting_value: Option<&str>,
    ) -> Result<()> {
        let span = match span {
            Some(span) => span,
            None => return Ok(()),
        };
        debug_assert!(span.last < self.buckets.len());

        let is_point = range.is_point();

        if is_point {
            self.buckets[span.first].cardinality_points += 1;
        } else {
            for bucket in &mut self.buckets[span.first..=span.last] {
                bucket.cardinality_ranges += 1;
            }
        }

        if span.is_single_bucket() && is_point {
            self.buckets[span.first].selectivity_points += 1;
        } else {
            for bucket in &mut self.buckets[span.first..=span.last] {
                bucket.selectivity_ranges += 1;
            }
        }

        let lower_covers_first = match &range.lower {
            Endpoint::Unbounded => true,
            lower => match lower.literal() {
                Some(coordinate) => {
                    let cmp = compare_bucket_value(first_starting_value, coordinate)?;
                    cmp == Ordering::Greater || (cmp == Ordering::Equal && lower.is_closed())
                }
                None => false,
            },
        };
        // Only the last bucket of the histogram can be located by an unbounded
        // upper endpoint.
        let upper_covers_last = !range.upper.is_finite();

        if span.is_single_bucket() {
            if lower_covers_first && upper_covers_last {
                self.buckets[span.first].entirely_covered = true;
            }
            return Ok(());
        }

        if lower_covers_first {
            self.buckets[span.first].entirely_covered = true;
        }
        for bucket in &mut self.buckets[(span.first + 1)..span.last] {
            bucket.entirely_covered = true;
        }
        if upper_covers_last {
            debug_assert_eq!(span.last, self.buckets.len() - 1);
            self.buckets[span.last].entirely_covered = true;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::datatype::DataType;
    use crate::sarg::Literal;

    fn int(v: i64) -> Literal {
        Literal::new(DataType::Int64, v)
    }

    fn span(first: usize, last: usize) -> Option<BucketSpan> {
        Some(BucketSpan { first, last })
    }

    fn assert_approx(expected: f64, got: Option<f64>) {
        let got = got.expect("value to be known");
        assert!(
            (expected - got).abs() < 1e-9,
            "expected {expected}, got {got}"
        );
    }

    #[test]
    fn empty_span_is_noop() {
        let mut cov = HistogramCoverage::new(2);
        cov.add_range(&SearchRange::point(int(1)), None, Some("0"))
            .unwrap();
        assert_eq!(HistogramCoverage::new(2), cov);
    }

    #[test]
    fn point_in_single_bucket() {
        let mut cov = HistogramCoverage::new(2);
        cov.add_range(&SearchRange::point(int(50)), span(0, 0), Some("0"))
            .unwrap();

        let expected = BucketCoverage {
            cardinality_points: 1,
            selectivity_points: 1,
            ..Default::default()
        };
        assert_eq!(expected, cov.buckets()[0]);
        assert_eq!(BucketCoverage::default(), cov.buckets()[1]);
    }

    #[test]
    fn point_over_multiple_buckets() {
        let mut cov = HistogramCoverage::new(4);
        cov.add_range(&SearchRange::point(int(5)), span(0, 2), Some("0"))
            .unwrap();

        assert_eq!(1, cov.buckets()[0].cardinality_points);
        assert_eq!(0, cov.buckets()[1].cardinality_points);
        for bucket in &cov.buckets()[0..3] {
            assert_eq!(1, bucket.selectivity_ranges);
            assert_eq!(0, bucket.cardinality_ranges);
        }
        // Bucket starting at 0 may hold values below 5.
        assert!(!cov.buckets()[0].entirely_covered);
        assert!(cov.buckets()[1].entirely_covered);
        assert!(!cov.buckets()[2].entirely_covered);
    }

    #[test]
    fn range_within_single_bucket() {
        let mut cov = HistogramCoverage::new(3);
        let range = SearchRange::new(Endpoint::closed(int(110)), Endpoint::closed(int(120)));
        cov.add_range(&range, span(1, 1), Some("100")).unwrap();

        let expected = BucketCoverage {
            cardinality_ranges: 1,
            selectivity_ranges: 1,
            ..Default::default()
        };
        assert_eq!(expected, cov.buckets()[1]);
    }

    #[test]
    fn lower_bound_tie_break() {
        // [100, 300) over buckets starting 0, 100, 200, 300.
        let closed = SearchRange::new(Endpoint::closed(int(100)), Endpoint::open(int(300)));
        let mut cov = HistogramCoverage::new(4);
        cov.add_range(&closed, span(1, 2), Some("100")).unwrap();
        assert!(cov.buckets()[1].entirely_covered);
        assert!(!cov.buckets()[2].entirely_covered);

        // (100, 300) excludes the first value of bucket 1.
        let open = SearchRange::new(Endpoint::open(int(100)), Endpoint::open(int(300)));
        let mut cov = HistogramCoverage::new(4);
        cov.add_range(&open, span(1, 2), Some("100")).unwrap();
        assert!(!cov.buckets()[1].entirely_covered);
        assert!(!cov.buckets()[2].entirely_covered);

        // (50, 300) starts below bucket 1 entirely.
        let below = SearchRange::new(Endpoint::open(int(50)), Endpoint::open(int(300)));
        let mut cov = HistogramCoverage::new(4);
        cov.add_range(&below, span(1, 2), Some("100")).unwrap();
        assert!(cov.buckets()[1].entirely_covered);
    }

    #[test]
    fn unbounded_range_covers_all() {
        let mut cov = HistogramCoverage::new(3);
        cov.add_range(&SearchRange::unbounded(), span(0, 2), Some("0"))
            .unwrap();
        assert!(cov.buckets().iter().all(|b| b.entirely_covered));
    }

    #[test]
    fn unbounded_single_bucket_histogram() {
        let mut cov = HistogramCoverage::new(1);
        cov.add_range(&SearchRange::unbounded(), span(0, 0), Some("0"))
            .unwrap();
        assert!(cov.buckets()[0].entirely_covered);
    }

    #[test]
    fn tallies_accumulate() {
        let mut cov = HistogramCoverage::new(2);
        cov.add_range(&SearchRange::point(int(10)), span(0, 0), Some("0"))
            .unwrap();
        cov.add_range(&SearchRange::point(int(20)), span(0, 0), Some("0"))
            .unwrap();
        assert_eq!(2, cov.buckets()[0].cardinality_points);
        assert_eq!(2, cov.buckets()[0].selectivity_points);
    }

    #[test]
    fn fraction_estimates() {
        let zero = EmptyBucketFraction::Zero;

        let untouched = BucketCoverage::default();
        assert_eq!(Some(0.0), untouched.estimate_fraction(Some(10.0), zero));
        assert_eq!(
            None,
            untouched.estimate_fraction(Some(10.0), EmptyBucketFraction::Unknown)
        );

        let entire = BucketCoverage {
            entirely_covered: true,
            ..Default::default()
        };
        assert_eq!(Some(1.0), entire.estimate_fraction(None, zero));

        let points = BucketCoverage {
            selectivity_points: 2,
            ..Default::default()
        };
        assert_approx(0.2, points.estimate_fraction(Some(10.0), zero));
        // Cardinality below one treated as one.
        assert_eq!(Some(1.0), points.estimate_fraction(Some(0.5), zero));
        assert_eq!(None, points.estimate_fraction(None, zero));

        let mixed = BucketCoverage {
            selectivity_points: 2,
            selectivity_ranges: 1,
            ..Default::default()
        };
        assert_approx(0.6, mixed.estimate_fraction(Some(10.0), zero));
        assert_eq!(Some(0.5), mixed.estimate_fraction(None, zero));
    }

    #[test]
    fn cardinality_estimates() {
        let untouched = BucketCoverage::default();
        assert_eq!(Some(0.0), untouched.estimate_cardinality(Some(10.0)));

        let points = BucketCoverage {
            cardinality_points: 3,
            ..Default::default()
        };
        assert_eq!(Some(3.0), points.estimate_cardinality(Some(10.0)));
        assert_eq!(Some(3.0), points.estimate_cardinality(None));

        let range = BucketCoverage {
            cardinality_points: 2,
            cardinality_ranges: 1,
            ..Default::default()
        };
        assert_eq!(Some(6.0), range.estimate_cardinality(Some(10.0)));
        assert_eq!(None, range.estimate_cardinality(None));
        // Points already saturate the bucket.
        assert_eq!(Some(2.0), range.estimate_cardinality(Some(1.5)));

        let entire = BucketCoverage {
            entirely_covered: true,
            cardinality_ranges: 1,
            ..Default::default()
        };
        assert_eq!(Some(10.0), entire.estimate_cardinality(Some(10.0)));
    }
}

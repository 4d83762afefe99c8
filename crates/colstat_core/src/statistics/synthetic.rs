//! Generate histograms with a known shape without running a collection
//! pipeline.

use chrono::{DateTime, Utc};
use colstat_error::{DbError, Result};

use crate::config::synthetic::SyntheticHistogramConfig;
use crate::histogram::{Bucket, Histogram};

/// Shape of the column to generate a histogram for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticColumn {
    pub row_count: u64,
    pub distinct_values: u64,
    /// Percent of rows sampled, 0 to 100.
    pub sample_percent: u32,
    pub sample_distinct_values: u64,
    /// Ordered alphabet used to build bucket starting values.
    pub value_digits: String,
    /// Append an extra digit to every starting value.
    pub widen_values: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticHistogramGenerator {
    config: SyntheticHistogramConfig,
}

impl SyntheticHistogramGenerator {
    pub fn new(config: SyntheticHistogramConfig) -> Self {
        SyntheticHistogramGenerator { config }
    }

    pub fn generate(
        &self,
        column: &SyntheticColumn,
        analyze_time: DateTime<Utc>,
    ) -> Result<Histogram> {
        if column.sample_percent > 100 {
            return Err(DbError::new("Sample percent must be between 0 and 100")
                .with_field("sample_percent", column.sample_percent));
        }
        if self.config.max_bucket_count == 0 {
            return Err(DbError::new("Max bucket count must be greater than zero"));
        }

        let sample_rows = column
            .row_count
            .checked_mul(column.sample_percent as u64)
            .ok_or_else(|| {
                DbError::new("Sampled row count overflow").with_field("rows", column.row_count)
            })?
            / 100;

        if column.distinct_values > column.row_count {
            return Err(DbError::new("More distinct values than rows")
                .with_field("distinct", column.distinct_values)
                .with_field("rows", column.row_count));
        }
        if column.sample_distinct_values > column.distinct_values {
            return Err(DbError::new("More sampled distinct values than distinct values")
                .with_field("sampled_distinct", column.sample_distinct_values)
                .with_field("distinct", column.distinct_values));
        }
        if column.sample_distinct_values > sample_rows {
            return Err(DbError::new("More sampled distinct values than sampled rows")
                .with_field("sampled_distinct", column.sample_distinct_values)
                .with_field("sampled_rows", sample_rows));
        }

        let max_buckets = self.config.max_bucket_count as u64;
        let (bucket_count, rows_per_bucket, rows_last_bucket) = if sample_rows <= max_buckets {
            (sample_rows, 1, 1)
        } else {
            let rows_per = sample_rows.div_ceil(max_buckets);
            // Rounding up rows per bucket may leave the tail buckets empty,
            // only keep as many buckets as needed.
            let count = sample_rows.div_ceil(rows_per);
            (count, rows_per, sample_rows - (count - 1) * rows_per)
        };

        let digits: Vec<char> = column.value_digits.chars().collect();
        let values = starting_values(&digits, bucket_count as usize, column.widen_values)?;

        let buckets = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| {
                let idx = idx as u64;
                // Telescoping sum, so the counts add up to the sampled total.
                let count = (column.sample_distinct_values * (idx + 1)).div_ceil(bucket_count)
                    - (column.sample_distinct_values * idx).div_ceil(bucket_count);
                Bucket::new(value, count)
            })
            .collect();

        let hist = Histogram::new(
            analyze_time,
            Some(column.distinct_values),
            rows_per_bucket,
            rows_last_bucket,
            buckets,
        )
        .with_percentage_sampled(column.sample_percent);

        Ok(hist)
    }
}

/// Two digit (three when widened) ascending starting values.
fn starting_values(digits: &[char], bucket_count: usize, widen: bool) -> Result<Vec<String>> {
    if bucket_count == 0 {
        return Ok(Vec::new());
    }
    let d = digits.len();
    if bucket_count > d * d {
        return Err(DbError::new("Not enough value digits for bucket count")
            .with_field("digits", d)
            .with_field("buckets", bucket_count));
    }

    let iterations = bucket_count / d;
    let residual = bucket_count % d;

    let mut values = Vec::with_capacity(bucket_count);
    for (i, first) in digits.iter().enumerate() {
        let n = iterations + usize::from(i < residual);
        for second in &digits[..n] {
            let mut value = String::with_capacity(3);
            value.push(*first);
            value.push(*second);
            if widen {
                value.push(digits[0]);
            }
            values.push(value);
        }
    }

    Ok(values)
}

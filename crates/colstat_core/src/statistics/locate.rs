//! Locate the buckets a search range may intersect.
//!
//! Locating is a forward-only scan. When locating every range of a sorted,
//! non-overlapping sequence, the scan for each range starts at the last
//! bucket of the previous range. The total work for a sequence is then
//! proportional to bucket count plus range count.

use std::cmp::Ordering;

use colstat_error::{OptionExt, Result};

use super::compare::compare_bucket_value;
use crate::histogram::Bucket;
use crate::sarg::{Endpoint, SearchRange};

/// Inclusive span of bucket indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSpan {
    pub first: usize,
    pub last: usize,
}

impl BucketSpan {
    pub const fn is_single_bucket(&self) -> bool {
        self.first == self.last
    }
}

/// Find the span of buckets that `range` may intersect, starting the scan at
/// `min_bucket`.
///
/// Returns None if the range can't intersect any bucket.
pub fn locate_range(
    buckets: &[Bucket],
    range: &SearchRange,
    min_bucket: usize,
) -> Result<Option<BucketSpan>> {
    let start = find_start_bucket(buckets, min_bucket, &range.lower)?;
    let end = find_end_bucket(buckets, start, &range.upper)?;

    if start >= end {
        return Ok(None);
    }

    Ok(Some(BucketSpan {
        first: start,
        last: end - 1,
    }))
}

/// Find the first bucket that may contain the lower endpoint, or values
/// greater than it.
///
/// Buckets are skipped while the next bucket starts at or below the
/// endpoint. The last bucket is never ruled out since it has no upper
/// extent.
fn find_start_bucket(buckets: &[Bucket], min: usize, lower: &Endpoint) -> Result<usize> {
    if !lower.is_finite() {
        return Ok(0);
    }
    let coordinate = lower.literal().required("literal lower bound")?;
    let open = lower.is_open();

    let mut start = min;
    while start + 1 < buckets.len() {
        let next = &buckets[start + 1];
        let cmp = compare_bucket_value(next.starting_value.as_deref(), coordinate)?;
        match cmp {
            Ordering::Less => start += 1,
            Ordering::Equal if open => start += 1,
            _ => break,
        }
    }

    Ok(start)
}

/// Find the first bucket at or after `min` that can't contain the upper
/// endpoint, returning one past the last bucket if every bucket may contain
/// it.
fn find_end_bucket(buckets: &[Bucket], min: usize, upper: &Endpoint) -> Result<usize> {
    if !upper.is_finite() {
        return Ok(buckets.len());
    }
    let coordinate = upper.literal().required("literal upper bound")?;
    let open = upper.is_open();

    let mut end = min;
    while end < buckets.len() {
        let cmp = compare_bucket_value(buckets[end].starting_value.as_deref(), coordinate)?;
        match cmp {
            Ordering::Greater => break,
            Ordering::Equal if open => break,
            _ => end += 1,
        }
    }

    Ok(end)
}

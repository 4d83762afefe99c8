use std::cmp::Ordering;

use colstat_error::{DbError, Result};

use crate::arrays::datatype::{DataType, DecimalTypeMeta};
use crate::arrays::scalar::ScalarValue;
use crate::arrays::scalar::parse::{Decimal64Parser, Parser};
use crate::sarg::Literal;

/// Compare a bucket's starting value with a search coordinate.
///
/// Null (on either side) sorts before every non-null value, and null equals
/// null. Non-null bucket values are parsed using the coordinate's data type
/// and compared in that type's natural order.
///
/// Errors if the bucket value isn't a valid value for the coordinate's type.
pub fn compare_bucket_value(bucket_value: Option<&str>, coordinate: &Literal) -> Result<Ordering> {
    let bucket_value = match (bucket_value, coordinate.is_null()) {
        (None, true) => return Ok(Ordering::Equal),
        (None, false) => return Ok(Ordering::Less),
        (Some(_), true) => return Ok(Ordering::Greater),
        (Some(v), false) => v,
    };

    let parse_error = || {
        DbError::new("Failed to parse histogram bucket value")
            .with_field("value", bucket_value)
            .with_field("datatype", coordinate.datatype)
    };

    // Decimal bucket values may carry more digits than the coordinate's
    // scale. Those are compared at the wider scale instead of truncated.
    if let (ScalarValue::Decimal64(coord), Some((meta, extra))) = (
        &coordinate.value,
        excess_scale(bucket_value, coordinate.datatype),
    ) {
        return compare_wide_decimal(bucket_value, meta, *coord, extra).ok_or_else(parse_error);
    }

    let parsed =
        ScalarValue::parse_as(&coordinate.datatype, bucket_value).ok_or_else(parse_error)?;

    parsed.try_compare(&coordinate.value).ok_or_else(|| {
        DbError::new("Histogram bucket value not comparable with coordinate")
            .with_field("value", bucket_value)
            .with_field("coordinate", &coordinate.value)
            .with_field("datatype", coordinate.datatype)
    })
}

/// Number of fractional digits in `s` beyond a decimal type's scale, None if
/// there are none or the type isn't a decimal.
fn excess_scale(s: &str, datatype: DataType) -> Option<(DecimalTypeMeta, u32)> {
    let meta = match datatype {
        DataType::Decimal64(meta) => meta,
        _ => return None,
    };
    let (_, frac) = s.trim().split_once('.')?;
    let extra = frac.len() as i64 - meta.scale as i64;
    if extra > 0 {
        Some((meta, u32::try_from(extra).ok()?))
    } else {
        None
    }
}

fn compare_wide_decimal(
    s: &str,
    meta: DecimalTypeMeta,
    coord: i64,
    extra: u32,
) -> Option<Ordering> {
    let extra_digits = u8::try_from(extra).ok()?;
    let scale = meta.scale.checked_add(i8::try_from(extra).ok()?)?;
    let precision = meta.precision.checked_add(extra_digits)?;

    let bucket = Decimal64Parser::new(precision, scale).parse(s)?;
    let coord = coord.checked_mul(10_i64.checked_pow(extra)?)?;

    Some(bucket.cmp(&coord))
}

pub mod parse;

use std::cmp::Ordering;
use std::fmt;

use parse::{
    BoolParser,
    Date32Parser,
    Decimal64Parser,
    Float64Parser,
    Int32Parser,
    Int64Parser,
    Parser,
    TimestampParser,
};

use crate::arrays::datatype::DataType;

/// A single typed value.
///
/// Decimals and temporal values are stored in their physical representation,
/// the accompanying `DataType` carries scale and unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Decimal64(i64),
    Date32(i32),
    Timestamp(i64),
    Utf8(String),
}

impl ScalarValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Parse a string into a scalar of the given type.
    ///
    /// Returns None if the string isn't a valid representation for the type.
    pub fn parse_as(datatype: &DataType, s: &str) -> Option<Self> {
        Some(match datatype {
            DataType::Boolean => ScalarValue::Boolean(BoolParser.parse(s)?),
            DataType::Int32 => ScalarValue::Int32(Int32Parser::new().parse(s)?),
            DataType::Int64 => ScalarValue::Int64(Int64Parser::new().parse(s)?),
            DataType::Float64 => ScalarValue::Float64(Float64Parser::new().parse(s)?),
            DataType::Decimal64(meta) => ScalarValue::Decimal64(
                Decimal64Parser::new(meta.precision, meta.scale).parse(s)?,
            ),
            DataType::Date32 => ScalarValue::Date32(Date32Parser.parse(s)?),
            DataType::Timestamp(unit) => {
                ScalarValue::Timestamp(TimestampParser { unit: *unit }.parse(s)?)
            }
            DataType::Utf8 => ScalarValue::Utf8(s.to_string()),
        })
    }

    /// Compare two scalars of the same physical type using that type's
    /// natural order.
    ///
    /// Nulls sort before every other value. Returns None if the scalars have
    /// different physical types.
    pub fn try_compare(&self, other: &ScalarValue) -> Option<Ordering> {
        Some(match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => Ordering::Equal,
            (ScalarValue::Null, _) => Ordering::Less,
            (_, ScalarValue::Null) => Ordering::Greater,
            (ScalarValue::Boolean(a), ScalarValue::Boolean(b)) => a.cmp(b),
            (ScalarValue::Int32(a), ScalarValue::Int32(b)) => a.cmp(b),
            (ScalarValue::Int64(a), ScalarValue::Int64(b)) => a.cmp(b),
            (ScalarValue::Float64(a), ScalarValue::Float64(b)) => a.total_cmp(b),
            (ScalarValue::Decimal64(a), ScalarValue::Decimal64(b)) => a.cmp(b),
            (ScalarValue::Date32(a), ScalarValue::Date32(b)) => a.cmp(b),
            (ScalarValue::Timestamp(a), ScalarValue::Timestamp(b)) => a.cmp(b),
            (ScalarValue::Utf8(a), ScalarValue::Utf8(b)) => a.cmp(b),
            _ => return None,
        })
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Decimal64(v) => write!(f, "{v}"),
            Self::Date32(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Utf8(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::datatype::DecimalTypeMeta;

    #[test]
    fn parse_as_each_type() {
        assert_eq!(
            Some(ScalarValue::Int64(50)),
            ScalarValue::parse_as(&DataType::Int64, "50")
        );
        assert_eq!(
            Some(ScalarValue::Decimal64(1250)),
            ScalarValue::parse_as(&DataType::Decimal64(DecimalTypeMeta::new(10, 2)), "12.5")
        );
        assert_eq!(
            Some(ScalarValue::Utf8("abc".to_string())),
            ScalarValue::parse_as(&DataType::Utf8, "abc")
        );
        assert_eq!(None, ScalarValue::parse_as(&DataType::Int32, "abc"));
    }

    #[test]
    fn numeric_order_not_lexicographic() {
        let a = ScalarValue::parse_as(&DataType::Int64, "9").unwrap();
        let b = ScalarValue::parse_as(&DataType::Int64, "100").unwrap();
        assert_eq!(Some(Ordering::Less), a.try_compare(&b));

        let a = ScalarValue::parse_as(&DataType::Utf8, "9").unwrap();
        let b = ScalarValue::parse_as(&DataType::Utf8, "100").unwrap();
        assert_eq!(Some(Ordering::Greater), a.try_compare(&b));
    }

    #[test]
    fn null_sorts_first() {
        assert_eq!(
            Some(Ordering::Less),
            ScalarValue::Null.try_compare(&ScalarValue::Int64(i64::MIN))
        );
        assert_eq!(
            Some(Ordering::Equal),
            ScalarValue::Null.try_compare(&ScalarValue::Null)
        );
    }

    #[test]
    fn mismatched_types_incomparable() {
        assert_eq!(
            None,
            ScalarValue::Int32(1).try_compare(&ScalarValue::Int64(1))
        );
    }
}

use std::fmt;

/// Metadata associated with decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalTypeMeta {
    pub precision: u8,
    pub scale: i8,
}

impl DecimalTypeMeta {
    pub const fn new(precision: u8, scale: i8) -> Self {
        DecimalTypeMeta { precision, scale }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

/// Column types a histogram can be interpreted with.
///
/// Bucket starting values are stored as strings, the data type of a search
/// coordinate decides how those strings are read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float64,
    Decimal64(DecimalTypeMeta),
    Date32,
    Timestamp(TimeUnit),
    Utf8,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::Float64 => write!(f, "Float64"),
            Self::Decimal64(meta) => write!(f, "Decimal64({},{})", meta.precision, meta.scale),
            Self::Date32 => write!(f, "Date32"),
            Self::Timestamp(unit) => match unit {
                TimeUnit::Second => write!(f, "Timestamp(s)"),
                TimeUnit::Millisecond => write!(f, "Timestamp(ms)"),
                TimeUnit::Microsecond => write!(f, "Timestamp(μs)"),
                TimeUnit::Nanosecond => write!(f, "Timestamp(ns)"),
            },
            Self::Utf8 => write!(f, "Utf8"),
        }
    }
}

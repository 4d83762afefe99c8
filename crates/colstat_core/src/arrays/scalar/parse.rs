//! Parsers for reading stored string values back into typed scalars.
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use num_traits::PrimInt;

use crate::arrays::datatype::TimeUnit;

/// Number of days between 0001-01-01 and 1970-01-01.
pub const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Logic for parsing a string into some type.
pub trait Parser {
    /// The type we'll be producing.
    type Type;

    /// Parse a string into `Type`, returning None if the parse cannot be done.
    fn parse(&mut self, s: &str) -> Option<Self::Type>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolParser;

impl Parser for BoolParser {
    type Type = bool;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        match s {
            "t" | "true" | "TRUE" | "T" => Some(true),
            "f" | "false" | "FALSE" | "F" => Some(false),
            _ => None,
        }
    }
}

/// Parser that uses the stdlib `FromStr` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FromStrParser<T: FromStr> {
    _type: PhantomData<T>,
}

impl<T: FromStr> FromStrParser<T> {
    pub const fn new() -> Self {
        FromStrParser { _type: PhantomData }
    }
}

impl<T: FromStr> Parser for FromStrParser<T> {
    type Type = T;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        T::from_str(s.trim()).ok()
    }
}

pub type Int32Parser = FromStrParser<i32>;
pub type Int64Parser = FromStrParser<i64>;
pub type Float64Parser = FromStrParser<f64>;

/// Parse a string date into a number of days since epoch.
///
/// Example formats:
///
/// '1992-10-11'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date32Parser;

impl Parser for Date32Parser {
    type Type = i32;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        let date = NaiveDate::from_str(s.trim()).ok()?;
        Some(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalParser<T: PrimInt> {
    precision: u8,
    scale: i8,
    _type: PhantomData<T>,
}

pub type Decimal64Parser = DecimalParser<i64>;

impl<T: PrimInt> DecimalParser<T> {
    pub fn new(precision: u8, scale: i8) -> Self {
        DecimalParser {
            precision,
            scale,
            _type: PhantomData,
        }
    }
}

impl<T: PrimInt> Parser for DecimalParser<T> {
    type Type = T;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        let bs = s.trim().as_bytes();
        let (neg, bs) = match bs.first() {
            Some(b'-') => (true, &bs[1..]),
            Some(b'+') => (false, &bs[1..]),
            _ => (false, bs),
        };

        let mut val = T::zero();
        let mut digits: u8 = 0; // Total number of digits.
        let mut decimals: i8 = 0; // Digits to right of decimal point.

        let ten = T::from(10)?;

        let mut iter = bs.iter();

        // Leading digits.
        for b in iter.by_ref() {
            match b {
                b'0'..=b'9' => {
                    // Leading zero.
                    if digits == 0 && *b == b'0' {
                        continue;
                    }
                    digits += 1;
                    val = val.checked_mul(&ten)?;
                    val = val.checked_add(&T::from(b - b'0')?)?;
                }
                b'.' => {
                    break;
                }
                _ => return None,
            }
        }

        // Digits after decimal.
        for b in iter {
            match b {
                b'0'..=b'9' => {
                    if decimals == self.scale {
                        continue;
                    }

                    decimals += 1;
                    digits += 1;
                    val = val.checked_mul(&ten)?;
                    val = val.checked_add(&T::from(b - b'0')?)?;
                }
                _ => return None,
            }
        }

        if self.scale < 0 {
            digits = digits.saturating_sub(self.scale.unsigned_abs());
            let exp = self.scale.unsigned_abs() as usize;
            val = val.checked_div(&num_traits::checked_pow(ten, exp)?)?;
        }

        if digits > self.precision {
            return None;
        }

        if decimals < self.scale {
            let exp = (self.scale - decimals) as usize;
            val = val.checked_mul(&num_traits::checked_pow(ten, exp)?)?;
        }

        if neg {
            val = T::zero().checked_sub(&val)?;
        }

        Some(val)
    }
}

/// Parse a timestamp into the number of `unit`s since epoch.
///
/// Accepts rfc3339, 'YYYY-MM-DD HH:MM:SS[.fff]', 'YYYY-MM-DD', or a unix
/// timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParser {
    pub unit: TimeUnit,
}

impl TimestampParser {
    fn convert(&self, dt: DateTime<Utc>) -> Option<i64> {
        match self.unit {
            TimeUnit::Second => Some(dt.timestamp()),
            TimeUnit::Millisecond => Some(dt.timestamp_millis()),
            TimeUnit::Microsecond => Some(dt.timestamp_micros()),
            TimeUnit::Nanosecond => dt.timestamp_nanos_opt(),
        }
    }
}

impl Parser for TimestampParser {
    type Type = i64;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            self.convert(dt.with_timezone(&Utc))
        } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            self.convert(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let dt = date.and_hms_opt(0, 0, 0)?;
            self.convert(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        } else if let Ok(unix_timestamp) = s.parse::<i64>() {
            self.convert(DateTime::<Utc>::from_timestamp(unix_timestamp, 0)?)
        } else {
            None
        }
    }
}

//! Search arguments on a single column.
//!
//! A predicate on a column is normalized upstream into a sequence of
//! disjoint, ascending ranges. Each range is bounded by two endpoints which
//! may be unbounded, or bounded by a coordinate with a strictness.

use std::fmt;

use crate::arrays::datatype::DataType;
use crate::arrays::scalar::ScalarValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// The coordinate itself is excluded from the range.
    Open,
    /// The coordinate itself is included in the range.
    Closed,
}

/// A constant value along with the type it should be interpreted as.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub datatype: DataType,
    pub value: ScalarValue,
}

impl Literal {
    pub fn new(datatype: DataType, value: impl Into<ScalarValue>) -> Self {
        Literal {
            datatype,
            value: value.into(),
        }
    }

    /// A typed SQL null.
    pub fn null(datatype: DataType) -> Self {
        Literal {
            datatype,
            value: ScalarValue::Null,
        }
    }

    pub const fn is_null(&self) -> bool {
        self.value.is_null()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Position of a bounded endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Literal(Literal),
    /// A dynamic parameter. Its value isn't known until execution.
    Parameter(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Negative infinity for a lower bound, positive infinity for an upper
    /// bound.
    Unbounded,
    Bounded {
        coordinate: Coordinate,
        strictness: Strictness,
    },
}

impl Endpoint {
    pub fn closed(literal: Literal) -> Self {
        Endpoint::Bounded {
            coordinate: Coordinate::Literal(literal),
            strictness: Strictness::Closed,
        }
    }

    pub fn open(literal: Literal) -> Self {
        Endpoint::Bounded {
            coordinate: Coordinate::Literal(literal),
            strictness: Strictness::Open,
        }
    }

    pub fn parameter(idx: usize, strictness: Strictness) -> Self {
        Endpoint::Bounded {
            coordinate: Coordinate::Parameter(idx),
            strictness,
        }
    }

    pub const fn is_finite(&self) -> bool {
        matches!(self, Endpoint::Bounded { .. })
    }

    /// Returns true if the endpoint is bounded by a closed coordinate.
    pub const fn is_closed(&self) -> bool {
        matches!(
            self,
            Endpoint::Bounded {
                strictness: Strictness::Closed,
                ..
            }
        )
    }

    /// Returns true if the endpoint is bounded by an open coordinate.
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            Endpoint::Bounded {
                strictness: Strictness::Open,
                ..
            }
        )
    }

    /// Get the literal bounding this endpoint, if any.
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Endpoint::Bounded {
                coordinate: Coordinate::Literal(lit),
                ..
            } => Some(lit),
            _ => None,
        }
    }

    /// If this endpoint is bounded by a null literal.
    pub fn is_null(&self) -> bool {
        self.literal().is_some_and(|lit| lit.is_null())
    }

    /// If histogram coverage can be computed for this endpoint.
    ///
    /// Only unbounded endpoints and endpoints bounded by literals can be
    /// placed in a histogram.
    pub fn is_literal_or_unbounded(&self) -> bool {
        match self {
            Endpoint::Unbounded => true,
            Endpoint::Bounded { coordinate, .. } => matches!(coordinate, Coordinate::Literal(_)),
        }
    }
}

/// A single contiguous range of values.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRange {
    pub lower: Endpoint,
    pub upper: Endpoint,
}

impl SearchRange {
    pub fn new(lower: Endpoint, upper: Endpoint) -> Self {
        SearchRange { lower, upper }
    }

    /// Range containing exactly one value.
    pub fn point(literal: Literal) -> Self {
        SearchRange {
            lower: Endpoint::closed(literal.clone()),
            upper: Endpoint::closed(literal),
        }
    }

    /// Range containing every value, including nulls.
    pub fn unbounded() -> Self {
        SearchRange {
            lower: Endpoint::Unbounded,
            upper: Endpoint::Unbounded,
        }
    }

    /// Returns true if both endpoints are closed on the same literal.
    pub fn is_point(&self) -> bool {
        if !self.lower.is_closed() || !self.upper.is_closed() {
            return false;
        }
        match (self.lower.literal(), self.upper.literal()) {
            (Some(lower), Some(upper)) => lower == upper,
            _ => false,
        }
    }

    pub fn has_only_literal_bounds(&self) -> bool {
        self.lower.is_literal_or_unbounded() && self.upper.is_literal_or_unbounded()
    }
}

impl fmt::Display for SearchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Endpoint::Unbounded => write!(f, "(-inf")?,
            Endpoint::Bounded {
                coordinate,
                strictness,
            } => {
                let bracket = match strictness {
                    Strictness::Open => '(',
                    Strictness::Closed => '[',
                };
                write!(f, "{bracket}{}", DisplayCoordinate(coordinate))?;
            }
        }
        write!(f, ", ")?;
        match &self.upper {
            Endpoint::Unbounded => write!(f, "+inf)"),
            Endpoint::Bounded {
                coordinate,
                strictness,
            } => {
                let bracket = match strictness {
                    Strictness::Open => ')',
                    Strictness::Closed => ']',
                };
                write!(f, "{}{bracket}", DisplayCoordinate(coordinate))
            }
        }
    }
}

struct DisplayCoordinate<'a>(&'a Coordinate);

impl fmt::Display for DisplayCoordinate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Coordinate::Literal(lit) => write!(f, "{lit}"),
            Coordinate::Parameter(idx) => write!(f, "${}", idx + 1),
        }
    }
}

/// Ordered sequence of non-overlapping ranges.
///
/// Ranges must be sorted ascending and must not overlap. This isn't checked,
/// bucket location relies on it to only ever scan forward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRangeSequence {
    ranges: Vec<SearchRange>,
}

impl SearchRangeSequence {
    pub fn new(ranges: Vec<SearchRange>) -> Self {
        SearchRangeSequence { ranges }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchRange> {
        self.ranges.iter()
    }

    /// Returns true if every endpoint in the sequence is either unbounded or
    /// a literal.
    pub fn has_only_literal_bounds(&self) -> bool {
        self.ranges.iter().all(|r| r.has_only_literal_bounds())
    }
}

impl FromIterator<SearchRange> for SearchRangeSequence {
    fn from_iter<T: IntoIterator<Item = SearchRange>>(iter: T) -> Self {
        SearchRangeSequence {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SearchRangeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, range) in self.ranges.iter().enumerate() {
            if idx > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Literal {
        Literal::new(DataType::Int64, v)
    }

    #[test]
    fn point_detection() {
        assert!(SearchRange::point(int(5)).is_point());
        assert!(!SearchRange::new(Endpoint::closed(int(5)), Endpoint::closed(int(6))).is_point());
        assert!(!SearchRange::new(Endpoint::open(int(5)), Endpoint::closed(int(5))).is_point());
        assert!(!SearchRange::unbounded().is_point());
    }

    #[test]
    fn null_point() {
        let range = SearchRange::point(Literal::null(DataType::Int64));
        assert!(range.is_point());
        assert!(range.lower.is_null());
    }

    #[test]
    fn literal_bounds() {
        let seq = SearchRangeSequence::new(vec![
            SearchRange::point(int(1)),
            SearchRange::new(Endpoint::open(int(5)), Endpoint::Unbounded),
        ]);
        assert!(seq.has_only_literal_bounds());

        let seq = SearchRangeSequence::new(vec![
            SearchRange::point(int(1)),
            SearchRange::new(
                Endpoint::parameter(0, Strictness::Open),
                Endpoint::Unbounded,
            ),
        ]);
        assert!(!seq.has_only_literal_bounds());
    }

    #[test]
    fn display_sequence() {
        let seq = SearchRangeSequence::new(vec![
            SearchRange::new(Endpoint::Unbounded, Endpoint::open(int(0))),
            SearchRange::point(int(5)),
            SearchRange::new(
                Endpoint::parameter(1, Strictness::Open),
                Endpoint::Unbounded,
            ),
        ]);
        assert_eq!("(-inf, 0) OR [5, 5] OR ($2, +inf)", seq.to_string());
    }
}

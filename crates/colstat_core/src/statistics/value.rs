use std::fmt;

/// A statistic that may or may not be known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatisticsValue<T> {
    Exact(T),
    Estimated(T),
    Unknown,
}

impl<T> StatisticsValue<T> {
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Exact(v) | Self::Estimated(v) => Some(v),
            Self::Unknown => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> StatisticsValue<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Exact(v) => StatisticsValue::Exact(f(v)),
            Self::Estimated(v) => StatisticsValue::Estimated(f(v)),
            Self::Unknown => StatisticsValue::Unknown,
        }
    }
}

impl<T: Copy> StatisticsValue<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T: fmt::Display> fmt::Display for StatisticsValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Estimated(v) => write!(f, "{v} [estimated]"),
            Self::Unknown => write!(f, "[unknown]"),
        }
    }
}

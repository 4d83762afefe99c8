//! Selectivity and cardinality estimation from column histograms.

pub mod compare;
pub mod coverage;
pub mod estimate;
pub mod locate;
pub mod synthetic;
pub mod value;

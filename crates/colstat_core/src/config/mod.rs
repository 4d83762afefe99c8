pub mod estimator;
pub mod synthetic;

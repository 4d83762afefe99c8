pub mod arrays;
pub mod catalog;
pub mod config;
pub mod histogram;
pub mod sarg;
pub mod statistics;

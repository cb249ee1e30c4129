pub mod employee;
pub mod punch;
pub mod summary;

pub mod aggregate;
pub mod hours;

pub mod calculator;
pub mod check;
pub mod identity;
pub mod log;
pub mod report;
pub mod sync;
pub mod window;

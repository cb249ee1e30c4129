pub mod check;
pub mod config;
pub mod init;
pub mod log;
pub mod report;
pub mod sync;

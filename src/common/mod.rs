//! Shared utilities: logging setup and time formatting.

pub mod logger;
pub mod time;

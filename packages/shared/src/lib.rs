//! Utilities shared by the TCP chat binaries: logging setup and time handling.

pub mod logger;
pub mod time;

//! Shared utilities for the TwinCanvas relay: logging setup and time helpers.

pub mod logger;
pub mod time;

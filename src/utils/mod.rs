//! Shared angle math, constants and logging setup

pub mod angle;
pub mod config;
pub mod logging;

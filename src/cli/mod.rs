//! Command-line entry: argument parsing, telemetry bootstrap, and action
//! dispatch.

pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod start;
pub mod telemetry;

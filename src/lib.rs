//! dml-common: shared building blocks for small command-line tools
//!
//! - [`config`]: layered TOML settings with command-line overrides
//! - [`logging`]: rotating, line-wrapping log files via `tracing`
//! - [`process`]: timed subprocess execution
//! - [`utils`]: file housekeeping

pub mod config;
pub mod logging;
pub mod process;
pub mod utils;

//! CLI command handlers for ProbeMapper.
//!
//! This module provides headless, scriptable access to the channel mapper
//! for acquisition setup scripts and automation.

pub mod common;
pub mod config;
pub mod layouts;
pub mod map;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode, RequestArgs};
pub use config::ConfigArgs;
pub use layouts::LayoutsArgs;
pub use map::MapArgs;
pub use validate::ValidateArgs;

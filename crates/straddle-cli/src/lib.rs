/*
[INPUT]:  Public API exports for the straddle CLI crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

// Re-export main types for convenience
pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use output::OutputFormat;

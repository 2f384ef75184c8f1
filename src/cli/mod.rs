//! Command-line interface for filesorter

pub mod args;
pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;

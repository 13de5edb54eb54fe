//! Subcommand handlers for the notecue binary.

pub mod completions;
pub mod config;
pub mod parse;
pub mod simulate;
pub mod stamp;

//! # rhea-cli
//!
//! Terminal front end: argument parsing, the interactive chat loop, profile and config commands.
//! Logs go to the log file only so they never interleave with streamed replies.

pub mod cli;
pub mod repl;

pub use cli::{Cli, Commands, ConfigCommand, ProfilesCommand};

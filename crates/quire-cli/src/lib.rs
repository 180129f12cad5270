//! Quire CLI library
//!
//! Argument parsing and subcommand implementations for the `quire` binary.

pub mod cli;
pub mod commands;

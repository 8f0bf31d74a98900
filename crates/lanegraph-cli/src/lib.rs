//! lanegraph-cli library
//!
//! This module exports the command-line viewer's configuration and commands
//! for use in integration tests.

pub mod commands;
pub mod config;
pub mod watch;

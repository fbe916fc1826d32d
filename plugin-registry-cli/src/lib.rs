//! plugin-registry CLI library
//!
//! This module exports the internal components of the CLI for testing purposes.

pub mod config;
pub mod output;

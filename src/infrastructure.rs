//! Infrastructure layer
//!
//! Command line parsing and layered configuration.

pub mod cli;
pub mod config;

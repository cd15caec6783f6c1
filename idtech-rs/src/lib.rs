//! idtech-rs library
//!
//! Command implementations and shared utilities behind the idtech-rs CLI.

pub mod cli;
pub mod commands;
pub mod utils;

//! Shared utilities for the idtech-rs CLI

pub mod table;
pub mod tree;

pub use table::*;
pub use tree::*;

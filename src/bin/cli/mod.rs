//! CLI module for Stylus Architect
//!
//! Handles source discovery, output formatting and logging setup

pub mod discover;
pub mod logging;
pub mod output;

pub use discover::*;
pub use logging::*;
pub use output::*;

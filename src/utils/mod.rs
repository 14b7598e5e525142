//! Utility modules for common functionality
//!
//! Logging setup, the run journal, terminal progress and prompts.

pub mod logger;
pub mod progress;
pub mod prompt;

//! I/O helpers for action handlers.

pub mod config;
pub mod git;
pub mod process;

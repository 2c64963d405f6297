//! CLI command handlers for `rollbook`.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod menu;
pub mod students;

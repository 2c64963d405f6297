//! Shared library for `rollbook`
//! Student profiles, attendance records and attendance reporting over flat files.

pub mod core;

pub use crate::core::config;

/// Returns the current version of the `rollbook` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

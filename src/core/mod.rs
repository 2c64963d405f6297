//! Core module: records, storage, roster operations and reporting

pub mod codec;
pub mod config;
pub mod models;
pub mod report;
pub mod roster;
pub mod store;

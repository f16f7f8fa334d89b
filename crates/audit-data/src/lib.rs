//! Data ingestion layer for the transcript audit.
//!
//! Responsible for discovering transcript files, extracting their text,
//! scanning for completion records, aggregating course progress and running
//! the top-level audit pipeline.

pub mod aggregator;
pub mod analysis;
pub mod extract;
pub mod parser;

pub use audit_core as core;

//! Core domain layer for the transcript audit.
//!
//! Holds the subject catalog, completion-record models, date parsing, the
//! shared error type, and CLI settings with persisted last-used parameters.

pub mod catalog;
pub mod dates;
pub mod error;
pub mod models;
pub mod settings;

//! Terminal UI layer for the transcript audit.
//!
//! Provides themes, subject/course/history table views, a plain-text report
//! renderer, and the main application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod course_view;
pub mod history_view;
pub mod report;
pub mod subject_view;
pub mod text;
pub mod themes;

pub use audit_core as core;

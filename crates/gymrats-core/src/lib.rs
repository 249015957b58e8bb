//! Shared domain types for the GymRats report pipeline.
//!
//! Holds the record and report models, the calendar filter (local day,
//! business days, week start), the national holiday table, CLI settings and
//! the crate-wide error type.

pub mod error;
pub mod holidays;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{ReportError, Result};

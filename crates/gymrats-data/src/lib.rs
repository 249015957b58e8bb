//! Data pipeline for the GymRats report.
//!
//! Responsible for discovering and reading export snapshots, extracting and
//! deduplicating check-in and cardio records, building the leaderboard and
//! cardio reports, and writing them out.

pub mod cardio;
pub mod dedup;
pub mod extractor;
pub mod leaderboard;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use gymrats_core as core;

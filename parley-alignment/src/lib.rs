//! # parley-alignment
//!
//! Scores how well a user's personality fits the current conversation.
//! The score feeds a ranking boost for personality-sourced suggestions and
//! never blocks a request.

mod analyzer;
mod matrix;

pub use analyzer::{AlignmentAnalyzer, LOW_ALIGNMENT};
pub use matrix::AlignmentMatrix;

//! # parley-core
//!
//! Foundation crate for the Parley suggestion engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ParleyConfig;
pub use errors::{ParleyError, ParleyResult};
pub use models::{
    AggregatedResult, Confidence, ContextSnapshot, Message, Suggestion, SuggestionSource,
    UserProfile,
};

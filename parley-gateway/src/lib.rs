//! # parley-gateway
//!
//! Fans a prompt out to every registered suggestion provider concurrently.
//! Per-call timeouts, a global deadline, priority tiers with optional
//! short-circuiting, and fail-open error handling: a failing provider
//! contributes an empty list and a classified error, never an abort.

pub mod decoding;
pub mod gateway;
pub mod prompt;
pub mod providers;
pub mod tiers;

pub use decoding::decode_suggestions;
pub use gateway::{FanOutReport, ProviderGateway, ProviderOutcome};
pub use prompt::{build_prompt, parse_prompt, PromptParts};
pub use tiers::ProviderTiers;

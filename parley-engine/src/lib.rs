//! # parley-engine
//!
//! The suggestion engine. Owns every component (context windows, provider
//! gateway, profile store, alignment analyzer, aggregator, result cache,
//! metrics, degradation log) as explicit instances; there is no global
//! state.
//!
//! ```no_run
//! # async fn demo(neural: std::sync::Arc<dyn parley_core::traits::ISuggestionProvider>) -> parley_core::ParleyResult<()> {
//! use parley_core::models::SuggestionRequest;
//! use parley_core::ParleyConfig;
//! use parley_engine::SuggestionEngine;
//!
//! let engine = SuggestionEngine::builder(ParleyConfig::default())
//!     .provider(neural)
//!     .build()?;
//! let outcome = engine
//!     .suggest(SuggestionRequest::new("u1", "c1", "Hello, how are you", "es"))
//!     .await;
//! if let Some(result) = outcome.result() {
//!     println!("{:?}", result.top());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod engine;
pub mod maintenance;
mod request;

pub use builder::SuggestionEngineBuilder;
pub use engine::{SuggestionEngine, SuggestionOutcome};
pub use maintenance::MaintenanceHandle;

//! # parley-context
//!
//! Rolling conversation state for the suggestion engine.
//!
//! ## Modules
//!
//! - `window`: `ConversationContext`, a bounded message window
//! - `manager`: `ContextWindowManager`, per-conversation locking over `DashMap`
//! - `analysis`: tone, topic, and language detection
//! - `generation`: per-conversation request generations for stale-result discard
//! - `cleanup`: idle conversation removal

pub mod analysis;
pub mod cleanup;
pub mod generation;
pub mod manager;
pub mod window;

pub use cleanup::cleanup_idle;
pub use generation::GenerationTracker;
pub use manager::ContextWindowManager;
pub use window::ConversationContext;

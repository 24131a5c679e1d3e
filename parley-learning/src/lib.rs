//! # parley-learning
//!
//! Online adaptation of per-user provider weights. Every acceptance or
//! rejection moves the provider's weight along a bounded exponential moving
//! average; profiles live in memory behind per-user locks and are written
//! through to the persistence store when one is configured.

pub mod ema;
pub mod feedback;
mod store;

pub use ema::{ema_closed_form, ema_step, signal};
pub use feedback::{apply_feedback, FeedbackOutcome};
pub use store::{profile_key, ProfileStore};

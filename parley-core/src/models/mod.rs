mod alignment;
mod confidence;
mod context;
mod degradation_event;
mod profile;
mod request;
mod result;
mod suggestion;

pub use alignment::{AlignmentFactor, AlignmentScore};
pub use confidence::Confidence;
pub use context::{ContextSnapshot, Message, Speaker, Tone, Topic};
pub use degradation_event::DegradationEvent;
pub use profile::{PersonalityType, UserProfile};
pub use request::{Feedback, SuggestionRequest};
pub use result::{AggregatedResult, CacheEntry};
pub use suggestion::{normalize_text, Suggestion, SuggestionSource};

//! # parley-storage
//!
//! In-process implementation of [`IKeyValueStore`]. Used for profile and
//! result durability when no external store is configured, and in tests.

mod memory;

pub use memory::InMemoryKvStore;

pub use parley_core::traits::IKeyValueStore;

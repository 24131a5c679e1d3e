mod kv_store;
mod provider;

pub use kv_store::IKeyValueStore;
pub use provider::ISuggestionProvider;

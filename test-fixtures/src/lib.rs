//! Shared test support for the Parley workspace: golden fixture loading,
//! scripted suggestion providers, and key-value stores that fail or lag.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use parley_core::errors::{CacheError, ParseError, ProviderError, ProviderErrorKind};
use parley_core::models::{ContextSnapshot, Suggestion, SuggestionSource};
use parley_core::traits::{IKeyValueStore, ISuggestionProvider};
use serde::de::DeserializeOwned;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Load a fixture file as raw text (provider payload fixtures).
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// Provider with canned behaviour: fixed suggestions, an optional delay, an
/// optional scripted failure, and a call counter.
pub struct ScriptedProvider {
    id: String,
    source: SuggestionSource,
    suggestions: Vec<Suggestion>,
    delay: Duration,
    failure: Option<ProviderErrorKind>,
    available: bool,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// The source tag is derived from `id` when it names one, else neural.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let source = id.parse().unwrap_or(SuggestionSource::Neural);
        Self {
            id,
            source,
            suggestions: Vec::new(),
            delay: Duration::ZERO,
            failure: None,
            available: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_source(mut self, source: SuggestionSource) -> Self {
        self.source = source;
        for s in &mut self.suggestions {
            s.source = source;
        }
        self
    }

    pub fn with_suggestion(mut self, text: &str, confidence: f64) -> Self {
        self.suggestions
            .push(Suggestion::new(text, confidence, self.source));
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, kind: ProviderErrorKind) -> Self {
        self.failure = Some(kind);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn error(&self, kind: ProviderErrorKind, timeout: Duration) -> ProviderError {
        let provider = self.id.clone();
        match kind {
            ProviderErrorKind::Timeout => ProviderError::Timeout {
                provider,
                timeout_ms: timeout.as_millis() as u64,
            },
            ProviderErrorKind::AuthFailure => ProviderError::AuthFailure {
                provider,
                reason: "scripted".into(),
            },
            ProviderErrorKind::RateLimited => ProviderError::RateLimited {
                provider,
                retry_after_ms: Some(1000),
            },
            ProviderErrorKind::MalformedResponse => ProviderError::MalformedResponse {
                provider,
                source: ParseError::InvalidJson {
                    reason: "scripted".into(),
                },
            },
            ProviderErrorKind::NetworkError => ProviderError::NetworkError {
                provider,
                reason: "scripted".into(),
            },
        }
    }
}

#[async_trait]
impl ISuggestionProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> SuggestionSource {
        self.source
    }

    async fn call(
        &self,
        _prompt: &str,
        _context: &ContextSnapshot,
        timeout: Duration,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failure {
            Some(kind) => Err(self.error(kind, timeout)),
            None => Ok(self.suggestions.clone()),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// Key-value store whose every operation fails with `Unavailable`.
#[derive(Default)]
pub struct FlakyStore {
    attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations attempted against the store.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> CacheError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        CacheError::Unavailable {
            reason: "store offline".into(),
        }
    }
}

#[async_trait]
impl IKeyValueStore for FlakyStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(self.fail())
    }

    async fn set(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(self.fail())
    }
}

// ---------------------------------------------------------------------------
// Slow store
// ---------------------------------------------------------------------------

/// In-memory key-value store whose writes take `write_delay` to land.
pub struct SlowStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    write_delay: Duration,
}

impl SlowStore {
    pub fn new(write_delay: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            write_delay,
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IKeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        tokio::time::sleep(self.write_delay).await;
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().exists(), "test-fixtures directory not found");
    }

    #[test]
    fn all_golden_files_parse_as_json() {
        let mut total = 0;
        for dir in ["golden/ranking", "golden/learning", "golden/decoding"] {
            for file in list_fixtures(dir) {
                let content = std::fs::read_to_string(&file)
                    .unwrap_or_else(|e| panic!("Failed to read {}: {}", file.display(), e));
                let _: serde_json::Value = serde_json::from_str(&content)
                    .unwrap_or_else(|e| panic!("Failed to parse {}: {}", file.display(), e));
                total += 1;
            }
        }
        assert!(total >= 5, "expected golden files, found {total}");
    }

    #[tokio::test]
    async fn scripted_provider_counts_calls_and_fails_on_demand() {
        let p = ScriptedProvider::new("pattern").with_suggestion("Hi", 0.7);
        assert_eq!(p.source(), SuggestionSource::Pattern);
        let out = p
            .call("x", &ContextSnapshot::empty("c"), Duration::from_millis(5))
            .await
            .unwrap();
        assert_eq!(out[0].source, SuggestionSource::Pattern);

        let broken = ScriptedProvider::new("neural").failing(ProviderErrorKind::RateLimited);
        let err = broken
            .call("x", &ContextSnapshot::empty("c"), Duration::from_millis(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::RateLimited);
        assert_eq!(p.call_count() + broken.call_count(), 2);
    }

    #[tokio::test]
    async fn flaky_store_always_fails() {
        let store = FlakyStore::new();
        assert!(store.get("k").await.is_err());
        assert!(store.set("k", vec![1], None).await.is_err());
        assert!(store.delete("k").await.is_err());
        assert_eq!(store.attempts(), 3);
    }
}

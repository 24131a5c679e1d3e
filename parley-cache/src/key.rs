//! Stable cache keys.

use std::fmt;

use parley_core::models::normalize_text;

/// Field separator; cannot appear in normalized input.
const SEP: &[u8] = &[0x1f];

/// blake3 hex digest of (user, conversation, normalized input, target language).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(user_id: &str, conversation_id: &str, input: &str, target_language: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(user_id.as_bytes());
        hasher.update(SEP);
        hasher.update(conversation_id.as_bytes());
        hasher.update(SEP);
        hasher.update(normalize_text(input).as_bytes());
        hasher.update(SEP);
        hasher.update(target_language.trim().to_ascii_lowercase().as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

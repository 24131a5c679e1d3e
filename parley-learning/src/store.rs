//! ProfileStore: per-user profiles behind per-user async locks.
//!
//! The `DashMap` only hands out `Arc`s to slots; every read-modify-write
//! holds the slot's lock for its whole duration, including the write-through
//! to the persistence store, so concurrent feedback for one user is applied
//! (and persisted) strictly in order.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use parley_core::config::LearningConfig;
use parley_core::constants::PROFILE_KEY_PREFIX;
use parley_core::errors::ProfileError;
use parley_core::models::{Feedback, PersonalityType, UserProfile};
use parley_core::traits::IKeyValueStore;
use parley_observability::learning_span;
use parley_observability::tracing_setup::events;
use tokio::sync::Mutex;
use tracing::{debug, Instrument};

use crate::feedback::{apply_feedback, FeedbackOutcome};

struct Slot {
    profile: Mutex<UserProfile>,
    /// Last access, in epoch milliseconds. Read without taking the lock.
    touched_ms: AtomicI64,
}

impl Slot {
    fn new(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
            touched_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    fn touch(&self) {
        self.touched_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

/// Bounded in-memory profile cache with optional write-through persistence.
pub struct ProfileStore {
    profiles: DashMap<String, Arc<Slot>>,
    backing: Option<Arc<dyn IKeyValueStore>>,
    learning_rate: f64,
    default_weight: f64,
    max_profiles: usize,
    profile_ttl: Option<Duration>,
}

impl ProfileStore {
    pub fn new(config: &LearningConfig) -> Self {
        Self {
            profiles: DashMap::new(),
            backing: None,
            learning_rate: config.learning_rate,
            default_weight: config.default_weight,
            max_profiles: config.max_profiles.max(1),
            profile_ttl: (config.profile_ttl_secs > 0)
                .then(|| Duration::from_secs(config.profile_ttl_secs)),
        }
    }

    /// Persist profiles to `backing` and load them from it on first access.
    pub fn with_backing(mut self, backing: Arc<dyn IKeyValueStore>) -> Self {
        self.backing = Some(backing);
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Profiles currently held in memory.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.profiles.contains_key(user_id)
    }

    /// Current profile for `user_id`, created lazily (or loaded from the
    /// backing store) on first access.
    pub async fn get(&self, user_id: &str) -> UserProfile {
        let slot = self.slot(user_id).await;
        let profile = slot.profile.lock().await;
        profile.clone()
    }

    /// Apply feedback with an atomic read-modify-write on the user's profile.
    pub async fn apply_feedback(&self, feedback: &Feedback) -> FeedbackOutcome {
        let span = learning_span!(feedback.user_id, feedback.provider_id);
        async {
            let slot = self.slot(&feedback.user_id).await;
            let mut profile = slot.profile.lock().await;
            let outcome = apply_feedback(
                &mut profile,
                feedback,
                self.learning_rate,
                self.default_weight,
            );
            events::weight_updated(
                &outcome.user_id,
                &outcome.provider_id,
                outcome.old_weight,
                outcome.new_weight,
            );
            self.persist(&profile).await;
            outcome
        }
        .instrument(span)
        .await
    }

    /// Record an acceptance or rejection of `provider_id`. Returns the new weight.
    pub async fn update(&self, user_id: &str, provider_id: &str, accepted: bool) -> f64 {
        let feedback = if accepted {
            Feedback::accepted(user_id, provider_id)
        } else {
            Feedback::rejected(user_id, provider_id)
        };
        self.apply_feedback(&feedback).await.new_weight
    }

    /// Replace a user's profile wholesale (seeding, imports).
    pub async fn upsert(&self, profile: UserProfile) {
        let slot = self.slot(&profile.user_id).await;
        let mut current = slot.profile.lock().await;
        *current = profile;
        self.persist(&current).await;
    }

    pub async fn set_personality(&self, user_id: &str, personality: PersonalityType) {
        let slot = self.slot(user_id).await;
        let mut profile = slot.profile.lock().await;
        profile.personality = personality;
        profile.updated_at = Utc::now();
        self.persist(&profile).await;
    }

    /// Drop a profile from memory. The persisted copy is kept.
    ///
    /// A profile that is being read or updated stays resident; returns
    /// `false` in that case.
    pub fn evict(&self, user_id: &str) -> bool {
        self.profiles
            .remove_if(user_id, |_, slot| Arc::strong_count(slot) == 1)
            .is_some()
    }

    async fn slot(&self, user_id: &str) -> Arc<Slot> {
        if let Some(slot) = self.profiles.get(user_id) {
            slot.touch();
            return slot.clone();
        }

        // Load outside any map guard; a concurrent loader may win the insert.
        let profile = self
            .load(user_id)
            .await
            .unwrap_or_else(|| UserProfile::new(user_id));

        if self.profiles.len() >= self.max_profiles && !self.profiles.contains_key(user_id) {
            self.evict_least_recent();
        }
        self.profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Slot::new(profile)))
            .clone()
    }

    /// Evict the least recently used profile that no task is holding.
    ///
    /// A slot in use (cloned out of the map, possibly mid-update and not yet
    /// persisted) is never dropped: a later access would reload a stale copy
    /// from the backing store and fork the profile.
    fn evict_least_recent(&self) {
        let mut candidates: Vec<(i64, String)> = self
            .profiles
            .iter()
            .filter(|entry| Arc::strong_count(entry.value()) == 1)
            .map(|entry| {
                (
                    entry.value().touched_ms.load(Ordering::Relaxed),
                    entry.key().clone(),
                )
            })
            .collect();
        candidates.sort_unstable();

        for (_, user_id) in candidates {
            if self.evict(&user_id) {
                debug!(user_id = %user_id, "evicting least recently used profile");
                return;
            }
        }
    }

    async fn load(&self, user_id: &str) -> Option<UserProfile> {
        let backing = self.backing.as_ref()?;
        match self.try_load(backing.as_ref(), user_id).await {
            Ok(found) => found,
            Err(e) => {
                events::profile_persistence_failed(user_id, &e.to_string());
                None
            }
        }
    }

    async fn try_load(
        &self,
        backing: &dyn IKeyValueStore,
        user_id: &str,
    ) -> Result<Option<UserProfile>, ProfileError> {
        let bytes = backing
            .get(&profile_key(user_id))
            .await
            .map_err(|e| ProfileError::PersistenceFailed {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            })?;
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let profile = serde_json::from_slice::<UserProfile>(&bytes).map_err(|e| {
            ProfileError::Corrupt {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!(user_id, "profile loaded from store");
        Ok(Some(profile))
    }

    async fn persist(&self, profile: &UserProfile) {
        let Some(backing) = &self.backing else {
            return;
        };
        if let Err(e) = self.try_persist(backing.as_ref(), profile).await {
            events::profile_persistence_failed(&profile.user_id, &e.to_string());
        }
    }

    async fn try_persist(
        &self,
        backing: &dyn IKeyValueStore,
        profile: &UserProfile,
    ) -> Result<(), ProfileError> {
        let failed = |reason: String| ProfileError::PersistenceFailed {
            user_id: profile.user_id.clone(),
            reason,
        };
        let bytes = serde_json::to_vec(profile).map_err(|e| failed(e.to_string()))?;
        backing
            .set(&profile_key(&profile.user_id), bytes, self.profile_ttl)
            .await
            .map_err(|e| failed(e.to_string()))
    }
}

/// Persistence key for a user's profile.
pub fn profile_key(user_id: &str) -> String {
    format!("{PROFILE_KEY_PREFIX}{user_id}")
}

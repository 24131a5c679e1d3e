/// Profile store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("profile persistence failed for {user_id}: {reason}")]
    PersistenceFailed { user_id: String, reason: String },

    #[error("persisted profile for {user_id} is corrupt: {reason}")]
    Corrupt { user_id: String, reason: String },
}

use uuid::Uuid;

/// Failures surfaced by the task and session services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err.to_string())
    }
}

/// Failures of a key-value store. Never leaves the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("redis command failed: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store lock poisoned")]
    Poisoned,
}

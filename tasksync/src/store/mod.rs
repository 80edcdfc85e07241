use crate::error::StoreError;

mod file;
mod memory;
mod redis_store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// String-keyed durable storage for the serialized task list and user.
///
/// Calls are synchronous and expected to be fast; the services invoke them
/// inline without yielding.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

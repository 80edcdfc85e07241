use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{ClockAndIdGenerator, Task, User};

use crate::store::KeyValueStore;

/// Best-effort durable copy of the task list and the current user.
///
/// Storage failures are logged and swallowed: a save that fails leaves the
/// caller's in-memory state authoritative, and a load that fails falls back to
/// the sample tasks (or to no user).
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockAndIdGenerator>,
    tasks_key: String,
    user_key: String,
}

impl PersistenceGateway {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockAndIdGenerator>,
        tasks_key: impl Into<String>,
        user_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            tasks_key: tasks_key.into(),
            user_key: user_key.into(),
        }
    }

    pub fn save_tasks(&self, tasks: &[Task]) {
        debug!("Saving {} tasks", tasks.len());
        self.save(&self.tasks_key, tasks);
    }

    pub fn get_tasks(&self) -> Vec<Task> {
        self.load(&self.tasks_key).unwrap_or_else(|| {
            debug!("No stored tasks, seeding the sample set");
            Task::sample_tasks(self.clock.as_ref())
        })
    }

    pub fn save_user(&self, user: &User) {
        self.save(&self.user_key, user);
    }

    pub fn get_user(&self) -> Option<User> {
        self.load(&self.user_key)
    }

    pub fn clear_user(&self) {
        if let Err(e) = self.store.remove(&self.user_key) {
            warn!("Error clearing user: {}", e);
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error serializing {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            warn!("Error saving {}: {}", key, e);
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.store.get(key) {
            Ok(json) => json?,
            Err(e) => {
                warn!("Error loading {}: {}", key, e);
                return None;
            }
        };
        serde_json::from_str(&json)
            .map_err(|e| warn!("Discarding malformed {}: {}", key, e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use shared::SystemClock;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn gateway(store: Arc<dyn KeyValueStore>) -> PersistenceGateway {
        PersistenceGateway::new(store, Arc::new(SystemClock), "tasks", "user")
    }

    #[test]
    fn empty_store_yields_samples() {
        let persistence = gateway(Arc::new(MemoryStore::new()));
        assert_eq!(persistence.get_tasks().len(), 4);
    }

    #[test]
    fn tasks_round_trip_in_order() {
        let persistence = gateway(Arc::new(MemoryStore::new()));
        let mut tasks = Task::sample_tasks(&SystemClock);
        tasks[2] = tasks[2].toggled();
        tasks.reverse();

        persistence.save_tasks(&tasks);
        assert_eq!(persistence.get_tasks(), tasks);
    }

    #[test]
    fn saved_empty_list_stays_empty() {
        let persistence = gateway(Arc::new(MemoryStore::new()));
        persistence.save_tasks(&[]);
        assert!(persistence.get_tasks().is_empty());
    }

    #[test]
    fn corrupt_tasks_fall_back_to_samples() {
        let store = Arc::new(MemoryStore::new());
        store.set("tasks", "{ definitely not a list").unwrap();
        let persistence = gateway(store);
        assert_eq!(persistence.get_tasks().len(), 4);
    }

    #[test]
    fn user_lifecycle() {
        let persistence = gateway(Arc::new(MemoryStore::new()));
        assert_eq!(persistence.get_user(), None);

        let user = User::new(SystemClock.new_id(), "admin".into(), "admin@example.com".into());
        persistence.save_user(&user);
        assert_eq!(persistence.get_user(), Some(user));

        persistence.clear_user();
        persistence.clear_user();
        assert_eq!(persistence.get_user(), None);
    }

    #[test]
    fn corrupt_user_reads_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("user", "[1, 2, 3]").unwrap();
        assert_eq!(gateway(store).get_user(), None);
    }

    #[test]
    fn failing_store_never_surfaces() {
        let persistence = gateway(Arc::new(BrokenStore));
        persistence.save_tasks(&Task::sample_tasks(&SystemClock));
        persistence.save_user(&User::new(SystemClock.new_id(), "bob".into(), "b@b.co".into()));
        persistence.clear_user();
        assert_eq!(persistence.get_tasks().len(), 4);
        assert_eq!(persistence.get_user(), None);
    }
}

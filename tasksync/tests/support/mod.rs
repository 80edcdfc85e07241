use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tasksync::{
    AppContext, Config, MemoryStore, RemoteSource, SyncError, SystemClock, Task, User,
    INVALID_CREDENTIALS_MESSAGE,
};

/// Remote that answers instantly: creates echo their input, fetches can be made to fail.
#[derive(Default)]
pub struct EchoRemote {
    pub offline: AtomicBool,
}

#[async_trait]
impl RemoteSource for EchoRemote {
    async fn login(&self, username: &str, password: &str) -> Result<User, SyncError> {
        if username.eq_ignore_ascii_case("admin") && password == "password" {
            let mut user = User::new(uuid::Uuid::new_v4(), username.into(), "admin@example.com".into());
            user.is_logged_in = true;
            Ok(user)
        } else {
            Err(SyncError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.into()))
        }
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, SyncError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::Network("connection refused".into()));
        }
        Ok(vec![
            Task::new(&SystemClock, "remote one".into(), "fetched".into()),
            Task::new(&SystemClock, "remote two".into(), "fetched".into()),
        ])
    }

    async fn create_task(&self, task: Task) -> Result<Task, SyncError> {
        Ok(task)
    }
}

pub fn context_with(store: Arc<MemoryStore>, remote: Arc<EchoRemote>) -> AppContext {
    AppContext::with_parts(Config::default(), store, remote, Arc::new(SystemClock))
}

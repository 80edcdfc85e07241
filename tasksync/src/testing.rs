use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{ClockAndIdGenerator, Task, User};
use uuid::Uuid;

use crate::error::SyncError;
use crate::remote::{RemoteSource, INVALID_CREDENTIALS_MESSAGE, REMOTE_TASK_DESCRIPTION};

/// Deterministic ids and timestamps, one second apart.
#[derive(Default)]
pub struct SequenceClock {
    next: AtomicU64,
}

impl ClockAndIdGenerator for SequenceClock {
    fn new_id(&self) -> Uuid {
        Uuid::from_u128(self.next.fetch_add(1, Ordering::Relaxed) as u128 + 1)
    }

    fn now(&self) -> DateTime<Utc> {
        let tick = self.next.load(Ordering::Relaxed) as i64;
        Utc.timestamp_opt(1_703_070_000, 0).unwrap() + Duration::seconds(tick)
    }
}

#[derive(Default)]
struct StubState {
    failure: Option<SyncError>,
    remote_titles: Vec<String>,
    created: Vec<Task>,
}

/// In-process remote: echoes creates, serves canned titles, fails on demand.
pub struct StubRemote {
    clock: Arc<dyn ClockAndIdGenerator>,
    state: Mutex<StubState>,
}

impl StubRemote {
    pub fn new(clock: Arc<dyn ClockAndIdGenerator>) -> Self {
        Self {
            clock,
            state: Mutex::new(StubState::default()),
        }
    }

    pub fn fail_with(&self, err: SyncError) {
        self.state.lock().unwrap().failure = Some(err);
    }

    pub fn set_remote_titles(&self, titles: &[&str]) {
        self.state.lock().unwrap().remote_titles = titles.iter().map(|t| t.to_string()).collect();
    }

    pub fn created(&self) -> Vec<Task> {
        self.state.lock().unwrap().created.clone()
    }

    fn check(&self) -> Result<(), SyncError> {
        match &self.state.lock().unwrap().failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteSource for StubRemote {
    async fn login(&self, username: &str, password: &str) -> Result<User, SyncError> {
        self.check()?;
        if username.to_lowercase() == "admin" && password == "password" {
            let mut user = User::new(self.clock.new_id(), username.to_string(), "admin@example.com".to_string());
            user.is_logged_in = true;
            Ok(user)
        } else {
            Err(SyncError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.to_string()))
        }
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, SyncError> {
        self.check()?;
        let titles = self.state.lock().unwrap().remote_titles.clone();
        Ok(titles
            .into_iter()
            .map(|title| Task::new(self.clock.as_ref(), title, REMOTE_TASK_DESCRIPTION.to_string()))
            .collect())
    }

    async fn create_task(&self, task: Task) -> Result<Task, SyncError> {
        self.check()?;
        self.state.lock().unwrap().created.push(task.clone());
        Ok(task)
    }
}

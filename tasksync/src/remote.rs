use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use shared::{ClockAndIdGenerator, Task, User};

use crate::config::Config;
use crate::error::SyncError;

pub const REMOTE_TASK_DESCRIPTION: &str = "fetched from remote API";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect login or password";
const ADMIN_EMAIL: &str = "admin@example.com";

/// The one network-facing dependency of the services.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<User, SyncError>;
    async fn fetch_tasks(&self) -> Result<Vec<Task>, SyncError>;
    async fn create_task(&self, task: Task) -> Result<Task, SyncError>;
}

#[derive(Debug, Deserialize)]
struct TodoItem {
    title: String,
    completed: bool,
}

/// Reads todos from a JSONPlaceholder-style endpoint; login and create are
/// simulated locally after an artificial delay.
pub struct HttpRemoteSource {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
    login_delay: Duration,
    create_delay: Duration,
    clock: Arc<dyn ClockAndIdGenerator>,
}

impl HttpRemoteSource {
    pub fn new(config: &Config, clock: Arc<dyn ClockAndIdGenerator>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limit: config.fetch_limit.max(1),
            login_delay: config.login_delay,
            create_delay: config.create_delay,
            clock,
        })
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn login(&self, username: &str, password: &str) -> Result<User, SyncError> {
        tokio::time::sleep(self.login_delay).await;

        if username.to_lowercase() == "admin" && password == "password" {
            let mut user = User::new(self.clock.new_id(), username.to_string(), ADMIN_EMAIL.to_string());
            user.is_logged_in = true;
            Ok(user)
        } else {
            Err(SyncError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.to_string()))
        }
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, SyncError> {
        let url = format!("{}/todos", self.base_url);
        debug!("GET {} (limit {})", url, self.limit);

        let items: Vec<TodoItem> = self
            .client
            .get(&url)
            .query(&[("_limit", self.limit)])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                warn!("Fetching tasks failed: {}", e);
                SyncError::from(e)
            })?
            .json()
            .await?;

        Ok(items
            .into_iter()
            .take(self.limit)
            .map(|item| Task {
                is_completed: item.completed,
                ..Task::new(
                    self.clock.as_ref(),
                    item.title,
                    REMOTE_TASK_DESCRIPTION.to_string(),
                )
            })
            .collect())
    }

    async fn create_task(&self, task: Task) -> Result<Task, SyncError> {
        tokio::time::sleep(self.create_delay).await;
        Ok(task)
    }
}

use std::sync::Arc;

use log::{info, warn};
use shared::User;
use tokio::sync::watch;

use crate::error::SyncError;
use crate::persistence::PersistenceGateway;
use crate::remote::RemoteSource;

/// Owns the current user. Storage is read once at construction and written on
/// login and logout; reads afterwards come from memory.
pub struct SessionService {
    persistence: PersistenceGateway,
    remote: Arc<dyn RemoteSource>,
    current_user: watch::Sender<Option<User>>,
}

impl SessionService {
    pub fn new(persistence: PersistenceGateway, remote: Arc<dyn RemoteSource>) -> Self {
        let restored = persistence.get_user().filter(|user| user.is_logged_in);
        if let Some(user) = &restored {
            info!("Restored session for {}", user.username);
        }

        let (current_user, _) = watch::channel(restored);
        Self {
            persistence,
            remote,
            current_user,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, SyncError> {
        let user = self.remote.login(username, password).await.map_err(|e| {
            warn!("Login failed for {}: {}", username, e);
            e
        })?;

        info!("Logged in as {}", user.username);
        self.persistence.save_user(&user);
        self.current_user.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Clears the session in memory and in storage; harmless when already logged out.
    pub fn logout(&self) {
        if let Some(user) = self.current_user.send_replace(None) {
            info!("Logged out {}", user.username);
        }
        self.persistence.clear_user();
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current_user.subscribe()
    }
}

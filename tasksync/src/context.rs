use std::sync::Arc;

use log::info;
use shared::{ClockAndIdGenerator, SystemClock};

use crate::config::{Config, StoreKind};
use crate::error::SyncError;
use crate::persistence::PersistenceGateway;
use crate::remote::{HttpRemoteSource, RemoteSource};
use crate::session::SessionService;
use crate::store::{FileStore, KeyValueStore, MemoryStore, RedisStore};
use crate::tasks::TaskService;

/// One set of services per application scope, wired from a [`Config`].
pub struct AppContext {
    config: Config,
    tasks: TaskService,
    session: SessionService,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self, SyncError> {
        let clock: Arc<dyn ClockAndIdGenerator> = Arc::new(SystemClock);
        let store = open_store(&config)?;
        let remote = Arc::new(HttpRemoteSource::new(&config, clock.clone())?);
        Ok(Self::with_parts(config, store, remote, clock))
    }

    /// Wires the services around caller-supplied capabilities.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSource>,
        clock: Arc<dyn ClockAndIdGenerator>,
    ) -> Self {
        let persistence = PersistenceGateway::new(
            store,
            clock.clone(),
            config.tasks_key.clone(),
            config.user_key.clone(),
        );
        let tasks = TaskService::new(
            persistence.clone(),
            remote.clone(),
            clock,
            config.seed_from_storage_on_init,
        );
        let session = SessionService::new(persistence, remote);

        Self {
            config,
            tasks,
            session,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn is_valid_username(&self, username: &str) -> bool {
        shared::is_valid_username(username)
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        shared::is_valid_email(email)
    }

    pub fn info(&self) -> String {
        let store = match &self.config.store {
            StoreKind::Memory => "in-memory".to_string(),
            StoreKind::File(path) => format!("file ({})", path.display()),
            StoreKind::Redis(url) => format!("redis ({})", url),
        };
        format!(
            "Task sync service\n\
             =================\n\
             - Remote source: {}/todos (limit {})\n\
             - Storage: {}\n\
             - Seeded from storage on start: {}\n\
             - Shared models in `shared`, services in `tasksync`",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.fetch_limit,
            store,
            self.config.seed_from_storage_on_init,
        )
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, SyncError> {
    let kind = &config.store;
    let store: Arc<dyn KeyValueStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File(path) => Arc::new(FileStore::new(path.clone())),
        StoreKind::Redis(url) => Arc::new(
            RedisStore::open(url, config.store_timeout).map_err(|e| SyncError::Config(format!("redis: {}", e)))?,
        ),
    };
    info!("Using {:?} store", kind);
    Ok(store)
}

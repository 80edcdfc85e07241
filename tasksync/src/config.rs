use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::error::SyncError;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Which key-value store backs the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File(PathBuf),
    Redis(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub fetch_limit: usize,
    pub login_delay: Duration,
    pub create_delay: Duration,
    pub http_timeout: Duration,
    pub store_timeout: Duration,
    pub seed_from_storage_on_init: bool,
    pub store: StoreKind,
    pub tasks_key: String,
    pub user_key: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fetch_limit: 10,
            login_delay: Duration::from_millis(1000),
            create_delay: Duration::from_millis(500),
            http_timeout: Duration::from_secs(30),
            store_timeout: Duration::from_millis(2000),
            seed_from_storage_on_init: true,
            store: StoreKind::Memory,
            tasks_key: "saved_tasks".to_string(),
            user_key: "current_user".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, SyncError> {
        dotenv::dotenv().ok();
        let defaults = Config::default();

        let store = match env::var("TASKS_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreKind::Memory,
            "file" => StoreKind::File(
                env::var("TASKS_STORE_PATH")
                    .unwrap_or_else(|_| "tasksync.json".to_string())
                    .into(),
            ),
            "redis" => StoreKind::Redis(
                env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            ),
            other => return Err(SyncError::Config(format!("unknown store kind '{}'", other))),
        };

        Ok(Self {
            api_base_url: env::var("TASKS_API_BASE_URL").unwrap_or(defaults.api_base_url),
            fetch_limit: parse_var(
                "TASKS_FETCH_LIMIT",
                NonZeroUsize::new(defaults.fetch_limit).unwrap_or(NonZeroUsize::MIN),
            )
            .get(),
            login_delay: Duration::from_millis(parse_var(
                "TASKS_LOGIN_DELAY_MS",
                defaults.login_delay.as_millis() as u64,
            )),
            create_delay: Duration::from_millis(parse_var(
                "TASKS_CREATE_DELAY_MS",
                defaults.create_delay.as_millis() as u64,
            )),
            http_timeout: Duration::from_secs(parse_var(
                "TASKS_HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )),
            store_timeout: Duration::from_millis(parse_var(
                "TASKS_STORE_TIMEOUT_MS",
                defaults.store_timeout.as_millis() as u64,
            )),
            seed_from_storage_on_init: parse_var(
                "TASKS_SEED_FROM_STORAGE",
                defaults.seed_from_storage_on_init,
            ),
            store,
            tasks_key: env::var("TASKS_KEY").unwrap_or(defaults.tasks_key),
            user_key: env::var("USER_KEY").unwrap_or(defaults.user_key),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}, using the default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

//! Task list and session services shared by every client of the to-do demo.
//!
//! [`TaskService`] owns the in-memory list and writes it through to a
//! [`KeyValueStore`] after each change; [`SessionService`] does the same for
//! the logged-in [`User`]. Both talk to the outside world through a
//! [`RemoteSource`]. [`AppContext`] wires one instance of each from a
//! [`Config`].

mod config;
mod context;
mod error;
mod persistence;
mod remote;
mod session;
mod store;
mod tasks;

#[cfg(test)]
mod testing;

pub use config::{Config, StoreKind, DEFAULT_API_BASE_URL};
pub use context::AppContext;
pub use error::{StoreError, SyncError};
pub use persistence::PersistenceGateway;
pub use remote::{HttpRemoteSource, RemoteSource, INVALID_CREDENTIALS_MESSAGE, REMOTE_TASK_DESCRIPTION};
pub use session::SessionService;
pub use store::{FileStore, KeyValueStore, MemoryStore, RedisStore};
pub use tasks::TaskService;

pub use shared::{
    is_valid_email, is_valid_username, ClockAndIdGenerator, SystemClock, Task, User,
};

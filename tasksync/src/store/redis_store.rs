use std::time::Duration;

use redis::{Client, Commands, Connection};

use super::KeyValueStore;
use crate::error::StoreError;

/// Plain GET/SET/DEL against a redis server, opening a connection per call.
///
/// Connecting, reading and writing are each bounded by `timeout`, so an
/// unresponsive server fails the call instead of hanging the caller.
pub struct RedisStore {
    client: Client,
    timeout: Duration,
}

impl RedisStore {
    pub fn open(redis_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        Ok(Self { client, timeout })
    }

    fn connection(&self) -> Result<Connection, StoreError> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        Ok(conn)
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        Ok(conn.get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        conn.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        conn.del::<_, ()>(key)?;
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of fresh identifiers and creation timestamps.
pub trait ClockAndIdGenerator: Send + Sync {
    fn new_id(&self) -> Uuid;
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 ids and the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockAndIdGenerator for SystemClock {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

use chrono::{DateTime, Utc};

/// Source of "now" for `joined_at` / `last_login_at`. All timestamps are UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

use chrono::{DateTime, Utc};

/// Port providing the boundary between past and upcoming shows.
///
/// Production uses [`SystemClock`]; tests pin time with `MockClock`.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

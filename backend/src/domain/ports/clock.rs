//! Clock port so date stamping stays deterministic under test.

use chrono::{DateTime, Local};

/// Source of the server's local wall-clock time.
pub trait Clock: Send + Sync {
    /// Current moment in the server's local calendar.
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

//! Wall-clock source for per-tick contexts.

/// Source of the current wall-clock time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send {
    /// Current unix time in milliseconds
    fn now_ms(&self) -> i64;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

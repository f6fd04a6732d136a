//! Mock construction helpers

use netstats_rs::backend::{Clock, ViewBackend, ViewBridge};
use netstats_rs::config::{DashboardConfig, RefreshConfig};

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Config with fast ticks and no periodic full refresh during a test
pub fn fast_config() -> DashboardConfig {
    DashboardConfig {
        refresh: RefreshConfig {
            focused_tick_ms: 5,
            unfocused_tick_ms: 10,
            full_refresh_ms: 3_600_000,
        },
        ..Default::default()
    }
}

/// Backend on a fixed clock, with its bridge
pub fn create_test_backend(config: &DashboardConfig) -> (ViewBackend, ViewBridge) {
    let (backend, bridge) = ViewBackend::new(config).expect("valid test config");
    (backend.with_clock(Box::new(FixedClock(super::NOW_MS))), bridge)
}

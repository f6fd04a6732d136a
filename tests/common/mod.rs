//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use netstats_rs::types::{NodeMap, NodeSnapshot};
use std::time::Duration;

/// Unix time (ms) used as "now" across tests
pub const NOW_MS: i64 = 1_700_000_000_000;

/// Create a test timeout duration
pub fn test_timeout() -> Duration {
    Duration::from_millis(500)
}

/// Collect snapshots into a node map keyed by id
pub fn node_map(nodes: impl IntoIterator<Item = NodeSnapshot>) -> NodeMap {
    nodes.into_iter().map(|n| (n.id.clone(), n)).collect()
}

//! Synthetic telemetry for demos and tests
//!
//! [`MockFeed`] simulates a small network: the chain head advances by one
//! block per frame and each node randomly catches up, loses peers, changes
//! latency or goes offline. The generator is a seeded xorshift, so the same
//! seed always yields the same sequence of frames.
//!
//! # Enabling
//!
//! Only available with the `mock-feed` feature (on by default):
//!
//! ```bash
//! cargo run -- --mock-nodes 20
//! ```

use super::clock::{Clock, SystemClock};
use super::feed::{FeedFrame, TelemetryFeed};
use crate::error::Result;
use crate::types::{BlockInfo, NodeInfo, NodeMap, NodeSnapshot, NodeStats, ValidatorData};
use std::sync::Arc;

const GROUPS: [&str; 4] = ["Alpha Validators", "Bonsai Stake", "Cedar Labs", ""];

/// Seeded xorshift64 generator
#[derive(Debug, Clone)]
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.0 = s;
        s
    }

    /// Uniform in `[0, 1)`
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }
}

/// Synthetic network feed
pub struct MockFeed {
    rng: XorShift,
    clock: Box<dyn Clock>,
    nodes: NodeMap,
    head: u64,
    frames: u64,
    /// Stop after this many frames
    limit: Option<u64>,
}

impl MockFeed {
    /// Create a feed simulating `node_count` nodes
    pub fn new(node_count: usize, seed: u64) -> Self {
        let mut rng = XorShift::new(seed);
        let head = 1_000 + rng.below(1_000);
        let nodes = (0..node_count)
            .map(|i| {
                let node = Self::spawn_node(&mut rng, i, head);
                (node.id.clone(), node)
            })
            .collect();
        Self {
            rng,
            clock: Box::new(SystemClock),
            nodes,
            head,
            frames: 0,
            limit: None,
        }
    }

    /// Replace the clock used for block receive times
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stop after `frames` frames
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    pub fn head(&self) -> u64 {
        self.head
    }

    fn spawn_node(rng: &mut XorShift, index: usize, head: u64) -> NodeSnapshot {
        let group = GROUPS[rng.below(GROUPS.len() as u64) as usize];
        let registered = !group.is_empty();
        NodeSnapshot {
            id: format!("0x{:040x}", rng.next_u64() as u128 * (index as u128 + 1)),
            info: Some(NodeInfo {
                name: Some(format!("node-{:02}", index)),
                client: Some("celo/v1.8.0".to_string()),
                os: Some("linux".to_string()),
            }),
            stats: Some(NodeStats {
                active: true,
                peers: Some(5 + rng.below(30)),
                latency: Some(rng.below(200) as f64),
                uptime: Some(90.0 + rng.next_f64() * 10.0),
                elected: false,
            }),
            block: Some(BlockInfo {
                number: Some(head.saturating_sub(rng.below(3))),
                ..Default::default()
            }),
            validator_data: registered.then(|| ValidatorData {
                affiliation: Some(group.to_string()),
                registered,
                elected: rng.chance(0.5),
            }),
            pending: Some(rng.below(50)),
            updates: 1,
        }
    }

    /// Advance one node; returns whether anything changed
    fn step_node(rng: &mut XorShift, node: &mut NodeSnapshot, head: u64, now_ms: i64) -> bool {
        let mut changed = false;

        if let Some(stats) = node.stats.as_mut() {
            if rng.chance(0.02) {
                stats.active = !stats.active;
                changed = true;
            }
            if rng.chance(0.1) {
                let peers = stats.peers.unwrap_or(0) as i64 + rng.below(5) as i64 - 2;
                stats.peers = Some(peers.max(0) as u64);
                changed = true;
            }
            if rng.chance(0.2) {
                stats.latency = Some(rng.below(400) as f64);
                changed = true;
            }
            if !stats.active {
                return changed;
            }
        }

        // Most active nodes import the new block.
        if rng.chance(0.85) {
            if let Some(block) = node.block.as_mut() {
                block.number = Some(head);
                block.hash = Some(format!("0x{:064x}", rng.next_u64()));
                block.transactions = (0..rng.below(20)).map(|i| serde_json::json!(i)).collect();
                block.received = Some(now_ms);
                block.propagation = Some(rng.below(2_000) as f64);
                changed = true;
            }
            node.pending = Some(rng.below(50));
        }
        changed
    }
}

impl TelemetryFeed for MockFeed {
    fn next_frame(&mut self) -> Result<Option<FeedFrame>> {
        if self.limit.is_some_and(|limit| self.frames >= limit) {
            return Ok(None);
        }
        self.frames += 1;
        self.head += 1;

        let now_ms = self.clock.now_ms();
        for node in self.nodes.values_mut() {
            if Self::step_node(&mut self.rng, node, self.head, now_ms) {
                node.updates += 1;
            }
        }

        Ok(Some(FeedFrame {
            head: Some(self.head),
            nodes: Arc::new(self.nodes.clone()),
            reset: false,
        }))
    }
}

//! Test data builders for creating node snapshots

use netstats_rs::types::{BlockInfo, NodeInfo, NodeSnapshot, NodeStats, ValidatorData};

/// Builder for creating test node snapshots
pub struct NodeBuilder {
    node: NodeSnapshot,
}

impl NodeBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            node: NodeSnapshot {
                id: id.to_string(),
                updates: 1,
                ..Default::default()
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.node.info.get_or_insert_with(NodeInfo::default).name = Some(name.to_string());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.stats().active = active;
        self
    }

    pub fn peers(mut self, peers: u64) -> Self {
        self.stats().peers = Some(peers);
        self
    }

    pub fn latency(mut self, latency: f64) -> Self {
        self.stats().latency = Some(latency);
        self
    }

    pub fn uptime(mut self, uptime: f64) -> Self {
        self.stats().uptime = Some(uptime);
        self
    }

    pub fn block(mut self, number: u64) -> Self {
        self.block_info().number = Some(number);
        self
    }

    pub fn received(mut self, received_ms: i64) -> Self {
        self.block_info().received = Some(received_ms);
        self
    }

    pub fn propagation(mut self, ms: f64) -> Self {
        self.block_info().propagation = Some(ms);
        self
    }

    pub fn pending(mut self, pending: u64) -> Self {
        self.node.pending = Some(pending);
        self
    }

    pub fn validator(mut self, group: &str, registered: bool, elected: bool) -> Self {
        self.node.validator_data = Some(ValidatorData {
            affiliation: Some(group.to_string()),
            registered,
            elected,
        });
        self
    }

    pub fn updates(mut self, updates: u64) -> Self {
        self.node.updates = updates;
        self
    }

    pub fn build(self) -> NodeSnapshot {
        self.node
    }

    fn stats(&mut self) -> &mut NodeStats {
        self.node.stats.get_or_insert_with(NodeStats::default)
    }

    fn block_info(&mut self) -> &mut BlockInfo {
        self.node.block.get_or_insert_with(BlockInfo::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = NodeBuilder::new("0x01")
            .name("alpha")
            .active(true)
            .peers(4)
            .block(10)
            .updates(3)
            .build();

        assert_eq!(node.id, "0x01");
        assert_eq!(node.name(), Some("alpha"));
        assert!(node.is_active());
        assert_eq!(node.peers(), 4);
        assert_eq!(node.block_number(), Some(10));
        assert_eq!(node.updates, 3);
    }
}

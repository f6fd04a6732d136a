//! Core data types for netstats-rs
//!
//! This module contains the telemetry snapshot of a single observed node as
//! it arrives from the ingestion layer, and the insertion-ordered map of all
//! known nodes.
//!
//! # Main Types
//!
//! - [`NodeSnapshot`] - Everything known about one node at one instant
//! - [`NodeInfo`], [`NodeStats`], [`BlockInfo`], [`ValidatorData`] - Nested telemetry groups
//! - [`NodeMap`] - Node id to snapshot, in first-seen order
//!
//! # Partial Data
//!
//! Ingestion forwards whatever a node reported, so every nested group and
//! almost every field is optional. The accessor methods on [`NodeSnapshot`]
//! collapse missing data to zero/false and never panic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node id to snapshot. Iteration order is the order nodes were first seen,
/// which is the final tie-breaker when sorting the table.
pub type NodeMap = IndexMap<String, NodeSnapshot>;

/// Static information a node reports about itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeInfo {
    /// Display name chosen by the operator
    pub name: Option<String>,
    /// Client implementation and version
    pub client: Option<String>,
    /// Operating system
    pub os: Option<String>,
}

/// Connectivity and health statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeStats {
    /// Whether the node is currently connected
    #[serde(deserialize_with = "lenient::flag")]
    pub active: bool,
    /// Connected peer count
    #[serde(deserialize_with = "lenient::count")]
    pub peers: Option<u64>,
    /// Round-trip latency to the collector in milliseconds
    #[serde(deserialize_with = "lenient::number")]
    pub latency: Option<f64>,
    /// Uptime percentage over the observation window
    #[serde(deserialize_with = "lenient::number")]
    pub uptime: Option<f64>,
    /// Elected flag as reported in the stats payload
    #[serde(deserialize_with = "lenient::flag")]
    pub elected: bool,
}

/// The latest block the node reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockInfo {
    /// Block height
    #[serde(deserialize_with = "lenient::count")]
    pub number: Option<u64>,
    /// Block hash
    pub hash: Option<String>,
    /// Transactions in the block; only the count is displayed
    pub transactions: Vec<serde_json::Value>,
    /// Unix timestamp (ms) at which the collector received the block
    #[serde(deserialize_with = "lenient::timestamp")]
    pub received: Option<i64>,
    /// Time (ms) the block took to reach this node
    #[serde(deserialize_with = "lenient::number")]
    pub propagation: Option<f64>,
}

/// Validator registration state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorData {
    /// Validator group the node is affiliated with
    pub affiliation: Option<String>,
    /// Registered as a validator
    #[serde(deserialize_with = "lenient::flag")]
    pub registered: bool,
    /// Elected into the current validator set
    #[serde(deserialize_with = "lenient::flag")]
    pub elected: bool,
}

/// Everything known about one node at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// Unique node identifier (usually the node's address)
    pub id: String,
    pub info: Option<NodeInfo>,
    pub stats: Option<NodeStats>,
    pub block: Option<BlockInfo>,
    pub validator_data: Option<ValidatorData>,
    /// Pending transaction count
    #[serde(deserialize_with = "lenient::count")]
    pub pending: Option<u64>,
    /// Incremented by ingestion whenever any other field changes
    pub updates: u64,
}

impl NodeSnapshot {
    /// Create an empty snapshot for the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.stats.as_ref().is_some_and(|s| s.active)
    }

    pub fn name(&self) -> Option<&str> {
        self.info.as_ref().and_then(|i| i.name.as_deref())
    }

    pub fn peers(&self) -> u64 {
        self.stats.as_ref().and_then(|s| s.peers).unwrap_or(0)
    }

    pub fn pending(&self) -> u64 {
        self.pending.unwrap_or(0)
    }

    /// Latency in ms; absent or non-numeric latency reads as zero
    pub fn latency(&self) -> f64 {
        self.stats
            .as_ref()
            .and_then(|s| s.latency)
            .filter(|l| !l.is_nan())
            .unwrap_or(0.0)
    }

    pub fn uptime(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.uptime)
    }

    pub fn block_number(&self) -> Option<u64> {
        self.block.as_ref().and_then(|b| b.number)
    }

    pub fn transaction_count(&self) -> usize {
        self.block.as_ref().map_or(0, |b| b.transactions.len())
    }

    pub fn block_received(&self) -> Option<i64> {
        self.block.as_ref().and_then(|b| b.received)
    }

    pub fn propagation(&self) -> f64 {
        self.block
            .as_ref()
            .and_then(|b| b.propagation)
            .filter(|p| !p.is_nan())
            .unwrap_or(0.0)
    }

    pub fn affiliation(&self) -> Option<&str> {
        self.validator_data
            .as_ref()
            .and_then(|v| v.affiliation.as_deref())
    }

    pub fn is_registered(&self) -> bool {
        self.validator_data.as_ref().is_some_and(|v| v.registered)
    }

    /// Elected either per the validator record or per the stats payload
    pub fn is_elected(&self) -> bool {
        self.validator_data.as_ref().is_some_and(|v| v.elected)
            || self.stats.as_ref().is_some_and(|s| s.elected)
    }
}

/// Deserializers that coerce loosely typed telemetry fields instead of
/// rejecting the whole node. Anything that cannot be read as the target type
/// becomes `None` (or `false`).
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_f64(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        n.filter(|n| !n.is_nan())
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(to_f64(&Value::deserialize(d)?))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(d)?;
        if let Some(n) = value.as_u64() {
            return Ok(Some(n));
        }
        Ok(to_f64(&value)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.trunc() as u64))
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(d)?;
        if let Some(n) = value.as_i64() {
            return Ok(Some(n));
        }
        Ok(to_f64(&value)
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match &value {
            Value::Bool(b) => *b,
            Value::String(s) if s.eq_ignore_ascii_case("true") => true,
            _ => to_f64(&value).is_some_and(|n| n != 0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_defaults() {
        let node = NodeSnapshot::new("0xabc");
        assert!(!node.is_active());
        assert_eq!(node.peers(), 0);
        assert_eq!(node.pending(), 0);
        assert_eq!(node.latency(), 0.0);
        assert_eq!(node.block_number(), None);
        assert_eq!(node.transaction_count(), 0);
        assert_eq!(node.propagation(), 0.0);
        assert!(!node.is_registered());
        assert!(!node.is_elected());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let node: NodeSnapshot = serde_json::from_str(
            r#"{
                "id": "0x01",
                "stats": {"active": true, "peers": 12},
                "block": {"number": 100, "transactions": [{}, {}]},
                "validatorData": {"registered": true},
                "unknownField": 5,
                "updates": 3
            }"#,
        )
        .unwrap();

        assert_eq!(node.id, "0x01");
        assert!(node.is_active());
        assert_eq!(node.peers(), 12);
        assert_eq!(node.block_number(), Some(100));
        assert_eq!(node.transaction_count(), 2);
        assert!(node.is_registered());
        assert_eq!(node.updates, 3);
        assert_eq!(node.name(), None);
    }

    #[test]
    fn test_loosely_typed_fields_are_coerced() {
        let node: NodeSnapshot = serde_json::from_str(
            r#"{
                "id": "a",
                "stats": {"active": 1, "latency": "25", "peers": "3", "uptime": null, "elected": "true"},
                "block": {"number": 12.0, "received": "1700000000000", "propagation": [1]},
                "validatorData": {"registered": 0},
                "pending": -4
            }"#,
        )
        .unwrap();

        assert!(node.is_active());
        assert_eq!(node.latency(), 25.0);
        assert_eq!(node.peers(), 3);
        assert_eq!(node.uptime(), None);
        assert!(node.is_elected());
        assert_eq!(node.block_number(), Some(12));
        assert_eq!(node.block_received(), Some(1_700_000_000_000));
        assert_eq!(node.propagation(), 0.0);
        assert!(!node.is_registered());
        assert_eq!(node.pending(), 0);
    }

    #[test]
    fn test_elected_from_either_source() {
        let mut node = NodeSnapshot::new("a");
        node.stats = Some(NodeStats {
            elected: true,
            ..Default::default()
        });
        assert!(node.is_elected());

        let mut node = NodeSnapshot::new("b");
        node.validator_data = Some(ValidatorData {
            elected: true,
            ..Default::default()
        });
        assert!(node.is_elected());
    }
}

//! Telemetry feeds
//!
//! A feed produces successive node map snapshots for the worker. The crate
//! ships a newline-delimited JSON reader and (behind `mock-feed`) a
//! synthetic generator.
//!
//! # Frame format
//!
//! One JSON object per line:
//!
//! ```json
//! {"head": 1200, "nodes": [{"id": "0xab", "stats": {"active": true, "peers": 12}}]}
//! ```
//!
//! `reset: true` on a frame marks a reconnect. Nodes that carry no
//! `updates` counter get one assigned by comparing against the previous
//! frame.

use crate::error::{NetStatsError, Result, ResultExt};
use crate::types::{NodeMap, NodeSnapshot};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

/// One snapshot of the network
#[derive(Debug, Clone, Default)]
pub struct FeedFrame {
    /// Highest block known to the collector
    pub head: Option<u64>,
    pub nodes: Arc<NodeMap>,
    /// The collector reconnected; every row should be recomputed
    pub reset: bool,
}

/// Source of telemetry frames
pub trait TelemetryFeed: Send {
    /// Next frame, or `None` once the feed is exhausted
    fn next_frame(&mut self) -> Result<Option<FeedFrame>>;
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    head: Option<u64>,
    #[serde(default)]
    reset: bool,
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
}

/// Reads newline-delimited JSON frames
pub struct JsonFeed<R> {
    reader: R,
    line: usize,
    /// Last JSON seen per node id and the counter assigned to it
    previous: HashMap<String, (serde_json::Value, u64)>,
}

impl<R: BufRead> JsonFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            previous: HashMap::new(),
        }
    }

    /// Line number of the last line read
    pub fn line(&self) -> usize {
        self.line
    }

    fn parse_frame(&mut self, text: &str) -> Result<FeedFrame> {
        let raw: RawFrame = serde_json::from_str(text)?;
        if raw.reset {
            self.previous.clear();
        }

        let mut nodes = NodeMap::with_capacity(raw.nodes.len());
        let mut seen = HashMap::with_capacity(raw.nodes.len());
        for value in raw.nodes {
            let has_counter = value.get("updates").is_some();
            let mut node: NodeSnapshot = match serde_json::from_value(value.clone()) {
                Ok(node) => node,
                Err(e) => {
                    tracing::warn!("Line {}: skipping malformed node: {}", self.line, e);
                    continue;
                }
            };
            if node.id.is_empty() {
                continue;
            }
            if !has_counter {
                node.updates = match self.previous.get(&node.id) {
                    Some((prev, counter)) if *prev == value => *counter,
                    Some((_, counter)) => counter + 1,
                    None => 1,
                };
            }
            seen.insert(node.id.clone(), (value, node.updates));
            nodes.insert(node.id.clone(), node);
        }
        self.previous = seen;

        Ok(FeedFrame {
            head: raw.head,
            nodes: Arc::new(nodes),
            reset: raw.reset,
        })
    }
}

impl<R: BufRead + Send> TelemetryFeed for JsonFeed<R> {
    fn next_frame(&mut self) -> Result<Option<FeedFrame>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self
                .reader
                .read_line(&mut buf)
                .with_context(|| format!("Failed to read feed line {}", self.line + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = buf.trim();
            if text.is_empty() {
                continue;
            }
            match self.parse_frame(text) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    tracing::warn!("Line {}: skipping malformed frame: {}", self.line, e);
                }
            }
        }
    }
}

/// Open a JSON feed on a file, or on stdin for `-`
pub fn open_json_feed(path: &str) -> Result<Box<dyn TelemetryFeed>> {
    if path == "-" {
        let stdin = std::io::BufReader::new(std::io::stdin());
        return Ok(Box::new(JsonFeed::new(stdin)));
    }
    let file = std::fs::File::open(path)
        .map_err(|e| NetStatsError::Feed(format!("Failed to open {}: {}", path, e)))?;
    Ok(Box::new(JsonFeed::new(std::io::BufReader::new(file))))
}

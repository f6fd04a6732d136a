//! Incremental row materialization
//!
//! The materializer turns a node map into a [`RowSet`]. Work is proportional
//! to the nodes that changed: each node's `updates` counter is remembered
//! from the previous pass, and only nodes whose counter moved get a freshly
//! computed row. Everything else keeps the exact same `Arc<Row>`.
//!
//! A pass is *forced* (every row recomputed) when the caller's tick
//! generation differs from the previous pass, or when the column layout was
//! replaced in between. The worker bumps the generation on reconnects and on
//! its periodic full refresh, which keeps time-dependent cells current.

use super::row::{Row, RowSet};
use crate::columns::{ColumnLayout, Context};
use crate::types::NodeMap;
use std::collections::HashMap;
use std::sync::Arc;

/// What a materialization pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSetUpdate {
    /// Ids whose row was recomputed, in node-map order
    pub recomputed: Vec<String>,
    /// Ids that disappeared from the node map
    pub removed: Vec<String>,
    /// Whether every row was recomputed
    pub forced: bool,
}

impl RowSetUpdate {
    pub fn is_empty(&self) -> bool {
        self.recomputed.is_empty() && self.removed.is_empty()
    }
}

/// Keeps the row set in step with the node map
#[derive(Debug, Default)]
pub struct RowMaterializer {
    /// `updates` counter per node id as of the last pass
    last_seen: HashMap<String, u64>,
    rows: RowSet,
    last_generation: Option<u64>,
    layout_changed: bool,
}

impl RowMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rows
    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    /// Force the next pass to recompute every row
    pub fn invalidate(&mut self) {
        self.layout_changed = true;
    }

    /// Run one pass over `nodes`.
    ///
    /// Rows are keyed by the snapshot's own `id`; snapshots with an empty id
    /// are skipped.
    pub fn materialize(
        &mut self,
        nodes: &NodeMap,
        layout: &ColumnLayout,
        context: &Context,
        generation: u64,
    ) -> RowSetUpdate {
        let force = self.layout_changed || self.last_generation != Some(generation);
        let mut update = RowSetUpdate {
            forced: force,
            ..Default::default()
        };
        let mut next = RowSet::with_capacity(nodes.len());
        let mut dropped = 0usize;

        for node in nodes.values() {
            if node.id.is_empty() {
                dropped += 1;
                continue;
            }

            let changed = force || self.last_seen.get(&node.id) != Some(&node.updates);
            let row = match self.rows.get(&node.id) {
                Some(previous) if !changed => Arc::clone(previous),
                _ => {
                    update.recomputed.push(node.id.clone());
                    Arc::new(Row::compute(node, layout, context))
                }
            };

            self.last_seen.insert(node.id.clone(), node.updates);
            next.insert(node.id.clone(), row);
        }

        update.removed = self
            .rows
            .keys()
            .filter(|id| !next.contains_key(*id))
            .cloned()
            .collect();
        for id in &update.removed {
            self.last_seen.remove(id);
        }

        if dropped > 0 {
            tracing::debug!("Skipped {} node snapshots without an id", dropped);
        }
        tracing::trace!(
            recomputed = update.recomputed.len(),
            removed = update.removed.len(),
            total = next.len(),
            forced = force,
            "Materialized rows"
        );

        self.rows = next;
        self.last_generation = Some(generation);
        self.layout_changed = false;
        update
    }
}

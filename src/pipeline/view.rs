//! The live node table view model
//!
//! [`NodesView`] owns everything the table shows: the column layout, the
//! materialized rows and the display order. Rows are re-derived on each tick;
//! the order is recomputed whenever rows, the sort descriptor or the pinned
//! set change. Re-sorting always runs after materialization in the same
//! call, so the order is never computed against stale rows.

use super::materializer::{RowMaterializer, RowSetUpdate};
use super::row::{Row, RowSet};
use super::sorter::{order_ids, SortDescriptor};
use crate::columns::{ColumnLayout, Context};
use crate::types::NodeMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Rows plus their display order
#[derive(Debug)]
pub struct NodesView {
    materializer: RowMaterializer,
    layout: ColumnLayout,
    sort: SortDescriptor,
    pinned: HashSet<String>,
    ordered: Arc<Vec<String>>,
    /// Set when the layout changed and rows have not caught up yet
    stale_layout: bool,
}

impl Default for NodesView {
    fn default() -> Self {
        Self::new(ColumnLayout::default(), SortDescriptor::default())
    }
}

impl NodesView {
    pub fn new(layout: ColumnLayout, sort: SortDescriptor) -> Self {
        Self {
            materializer: RowMaterializer::new(),
            layout,
            sort,
            pinned: HashSet::new(),
            ordered: Arc::new(Vec::new()),
            stale_layout: false,
        }
    }

    /// Materialize `nodes` and re-sort.
    ///
    /// Returns the row update and whether the display order changed.
    pub fn apply_tick(
        &mut self,
        nodes: &NodeMap,
        context: &Context,
        generation: u64,
    ) -> (RowSetUpdate, bool) {
        let update = self
            .materializer
            .materialize(nodes, &self.layout, context, generation);
        self.stale_layout = false;
        let reordered = self.resort();
        (update, reordered)
    }

    /// Replace the sort descriptor. Returns whether the order changed.
    pub fn set_sort(&mut self, sort: SortDescriptor) -> bool {
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        self.resort()
    }

    /// Replace the pinned set. Returns whether the order changed.
    pub fn set_pinned(&mut self, pinned: HashSet<String>) -> bool {
        if pinned == self.pinned {
            return false;
        }
        self.pinned = pinned;
        self.resort()
    }

    /// Replace the column layout.
    ///
    /// Existing rows were computed for the old layout, so the order is not
    /// touched here; the next [`apply_tick`](Self::apply_tick) recomputes
    /// every row and re-sorts.
    pub fn set_layout(&mut self, layout: ColumnLayout) -> bool {
        if layout == self.layout {
            return false;
        }
        self.layout = layout;
        self.materializer.invalidate();
        self.stale_layout = true;
        true
    }

    /// Whether rows still reflect a previous layout
    pub fn is_layout_stale(&self) -> bool {
        self.stale_layout
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn sort(&self) -> &SortDescriptor {
        &self.sort
    }

    pub fn pinned(&self) -> &HashSet<String> {
        &self.pinned
    }

    pub fn rows(&self) -> &RowSet {
        self.materializer.rows()
    }

    pub fn row(&self, id: &str) -> Option<&Arc<Row>> {
        self.materializer.rows().get(id)
    }

    pub fn ordered_ids(&self) -> &[String] {
        &self.ordered
    }

    /// Shared handle to the current order
    pub fn order_handle(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.ordered)
    }

    /// Rows in display order
    pub fn ordered_rows(&self) -> impl Iterator<Item = &Arc<Row>> + '_ {
        self.ordered.iter().filter_map(|id| self.row(id))
    }

    fn resort(&mut self) -> bool {
        if self.stale_layout {
            return false;
        }
        let ordered = order_ids(self.materializer.rows(), &self.layout, &self.sort, &self.pinned);
        if ordered == *self.ordered {
            return false;
        }
        self.ordered = Arc::new(ordered);
        true
    }
}

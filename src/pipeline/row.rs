//! Materialized table rows.

use crate::columns::{Cell, CellContext, ColumnLayout, Context, RawValue};
use crate::types::NodeSnapshot;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

static MISSING: RawValue = RawValue::Missing;

/// Node id to row, in node-map order. Rows are shared; an unchanged node
/// keeps the same allocation across ticks.
pub type RowSet = IndexMap<String, Arc<Row>>;

/// One node rendered against a column layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    /// One cell per layout column, in layout order
    pub cells: Vec<Cell>,
}

impl Row {
    /// Compute every cell of `node` for `layout` using one shared context
    pub fn compute(node: &NodeSnapshot, layout: &ColumnLayout, context: &Context) -> Self {
        let cx = CellContext {
            context,
            node,
            explorer: layout.explorer(),
        };
        Self {
            id: node.id.clone(),
            cells: layout.columns().iter().map(|c| c.cell(node, &cx)).collect(),
        }
    }

    /// Raw value at column `index`, missing when out of range
    pub fn raw(&self, index: usize) -> &RawValue {
        self.cells.get(index).map_or(&MISSING, |c| &c.raw)
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

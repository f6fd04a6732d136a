//! Display ordering for the node table
//!
//! The final order is built from three stable passes over the row set:
//!
//! 1. sort by the secondary (tie-break) key
//! 2. sort by the active key
//! 3. move pinned rows to the top
//!
//! Each pass only reorders rows its own key distinguishes, so rows the active
//! key considers equal stay in secondary-key order, and rows equal on both
//! stay in node-map order.

use super::row::{Row, RowSet};
use crate::columns::{primary_column, tiebreak_column, ColumnLayout};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// +1 for ascending, -1 for descending
    pub fn sign(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// A column to sort by and its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

/// Active sort plus the key that breaks its ties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub active: SortKey,
    #[serde(alias = "default")]
    pub secondary: SortKey,
}

impl Default for SortDescriptor {
    fn default() -> Self {
        Self {
            active: SortKey::descending(primary_column().name),
            secondary: SortKey::ascending(tiebreak_column().name),
        }
    }
}

impl SortDescriptor {
    pub fn new(active: SortKey, secondary: SortKey) -> Self {
        Self { active, secondary }
    }

    /// Sort by `column`; picking the active column again flips its direction
    pub fn select_column(&mut self, column: &str) {
        if self.active.column.eq_ignore_ascii_case(column) {
            self.active.direction = self.active.direction.toggle();
        } else {
            self.active = SortKey::ascending(column);
        }
    }
}

/// Stable sort of `rows` by one key. Keys whose column is not in the layout
/// leave the order untouched.
fn sort_pass(rows: &mut [&Arc<Row>], layout: &ColumnLayout, key: &SortKey) {
    let Some(index) = layout.index_of(&key.column) else {
        return;
    };
    rows.sort_by(|a, b| key.direction.apply(a.raw(index).sort_cmp(b.raw(index))));
}

/// Compute the display order of `rows`: pinned first, then by the active
/// key, then by the secondary key, then by node-map order.
pub fn order_ids(
    rows: &RowSet,
    layout: &ColumnLayout,
    sort: &SortDescriptor,
    pinned: &HashSet<String>,
) -> Vec<String> {
    let mut ordered: Vec<&Arc<Row>> = rows.values().collect();

    sort_pass(&mut ordered, layout, &sort.secondary);
    sort_pass(&mut ordered, layout, &sort.active);
    if !pinned.is_empty() {
        ordered.sort_by_key(|row| !pinned.contains(&row.id));
    }

    ordered.into_iter().map(|row| row.id.clone()).collect()
}

//! Runtime settings that change while the dashboard is open
//!
//! These are the user-controlled inputs of the view model: which column the
//! table is sorted by, which nodes are pinned, and whether the host view is
//! currently visible and focused. They are owned by the surrounding
//! application (and persisted by it, if at all); the worker only ever
//! receives copies.

use crate::pipeline::SortDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visibility and focus of the view hosting the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    /// The table is on screen; no ticks run while hidden
    pub visible: bool,
    /// The window has input focus; refresh is faster while focused
    pub focused: bool,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            visible: true,
            focused: true,
        }
    }
}

impl HostState {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            focused: false,
        }
    }
}

/// User-controlled view settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub sort: SortDescriptor,
    pub pinned: HashSet<String>,
    pub host: HostState,
}

impl ViewSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains(id)
    }

    pub fn pin(&mut self, id: impl Into<String>) {
        self.pinned.insert(id.into());
    }

    pub fn unpin(&mut self, id: &str) {
        self.pinned.remove(id);
    }

    /// Toggle pinning of `id`; returns whether it is pinned afterwards
    pub fn toggle_pin(&mut self, id: &str) -> bool {
        if self.pinned.remove(id) {
            false
        } else {
            self.pinned.insert(id.to_string());
            true
        }
    }

    /// Sort by `column`, flipping direction if it is already active
    pub fn sort_by(&mut self, column: &str) {
        self.sort.select_column(column);
    }
}

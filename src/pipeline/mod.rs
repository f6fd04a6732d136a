//! Row materialization and ordering
//!
//! This is the derivation core: node snapshots go in, a row set and an
//! ordered id list come out.
//!
//! # Components
//!
//! - [`RowMaterializer`] - change-tracked projection of nodes into rows
//! - [`order_ids`] - stable three-pass sort with pinning
//! - [`NodesView`] - owns both and keeps the order in step with the rows
//!
//! # Example
//!
//! ```
//! use netstats_rs::columns::{ColumnLayout, Context};
//! use netstats_rs::pipeline::{NodesView, SortDescriptor};
//! use netstats_rs::types::{NodeMap, NodeSnapshot};
//!
//! let mut nodes = NodeMap::new();
//! nodes.insert("0x01".into(), NodeSnapshot::new("0x01"));
//!
//! let mut view = NodesView::new(ColumnLayout::default(), SortDescriptor::default());
//! let context = Context { head_block: Some(100), now_ms: 0 };
//! view.apply_tick(&nodes, &context, 0);
//!
//! assert_eq!(view.ordered_ids(), ["0x01"]);
//! ```

pub mod materializer;
pub mod row;
pub mod sorter;
pub mod view;

pub use materializer::{RowMaterializer, RowSetUpdate};
pub use row::{Row, RowSet};
pub use sorter::{order_ids, SortDescriptor, SortDirection, SortKey};
pub use view::NodesView;

//! # netstats-rs: live node table for a blockchain network monitor
//!
//! Turns a stream of per-node telemetry snapshots into a formatted,
//! severity-colored, sorted table. Rows are only recomputed for nodes whose
//! data changed, and the table order is stable with pinned nodes on top.
//!
//! ## Architecture
//!
//! - **Types**: node snapshots as delivered by ingestion, all fields optional
//! - **Format**: number formatting, severity buckets, address shortening
//! - **Columns**: static registry of column definitions (value, display, severity, link)
//! - **Pipeline**: change-tracked row materialization and the sort/pin pass
//! - **Backend**: worker thread, crossbeam channels and telemetry feeds
//!
//! ## Configuration
//!
//! Dashboard settings (columns, sort, refresh cadence) are read from
//! `config.toml` in the platform config directory under `netstats-rs`:
//!
//! - **Linux**: `~/.config/netstats-rs/`
//! - **macOS**: `~/Library/Application Support/netstats-rs/`
//! - **Windows**: `%APPDATA%\netstats-rs\`
//!
//! ## Example
//!
//! ```no_run
//! use netstats_rs::{
//!     backend::{open_json_feed, pump_feed, ViewBackend},
//!     config::DashboardConfig,
//! };
//! use std::time::Duration;
//!
//! fn main() -> netstats_rs::Result<()> {
//!     let config = DashboardConfig::load_or_default();
//!     let (backend, bridge) = ViewBackend::new(&config)?;
//!     let worker = std::thread::spawn(move || backend.run());
//!
//!     let mut feed = open_json_feed("telemetry.jsonl")?;
//!     pump_feed(feed.as_mut(), &bridge.cmd_tx, Duration::from_millis(100))?;
//!
//!     bridge.shutdown()?;
//!     let _ = worker.join();
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod columns;
pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use backend::{ViewBackend, ViewBridge, ViewCommand, ViewMessage};
pub use columns::{Cell, Column, ColumnLayout, Context, RawValue};
pub use config::{DashboardConfig, ViewSettings};
pub use error::{NetStatsError, Result};
pub use format::Severity;
pub use pipeline::{NodesView, Row, RowSet, SortDescriptor};
pub use types::{NodeMap, NodeSnapshot};

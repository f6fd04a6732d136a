//! View Worker Thread Implementation
//!
//! This module contains the loop that keeps the node table live. It runs in
//! its own thread, owns the [`NodesView`], and talks to everything else
//! through crossbeam channels.
//!
//! # Responsibilities
//!
//! - **Command processing**: applies node snapshots, chain head, sort, pins,
//!   layout and host-state changes as they arrive
//! - **Ticking**: materializes rows at the configured cadence, but only when
//!   something the rows depend on changed
//! - **Full refresh**: bumps the tick generation periodically (and on reset)
//!   so every row, including time-based cells, is recomputed
//! - **Publishing**: sends the row set, then the order derived from it
//!
//! # Cadence
//!
//! | Host state          | Tick period            |
//! |---------------------|------------------------|
//! | visible, focused    | `focused_tick_ms`      |
//! | visible, unfocused  | `unfocused_tick_ms`    |
//! | hidden              | no ticks, no messages  |
//!
//! Between ticks the worker blocks on the command channel, so an idle
//! dashboard costs nothing.

use crate::backend::bridge::{ViewCommand, ViewMessage, ViewSnapshot};
use crate::backend::clock::{Clock, SystemClock};
use crate::columns::Context;
use crate::config::{DashboardConfig, HostState, RefreshConfig};
use crate::pipeline::{NodesView, RowSetUpdate};
use crate::types::NodeMap;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counters describing the worker's activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Ticks that ran while visible
    pub ticks: u64,
    /// Ticks that materialized rows
    pub passes: u64,
    /// Rows recomputed across all passes
    pub rows_recomputed: u64,
    /// Messages dropped because the view was not keeping up
    pub dropped_messages: u64,
}

/// The worker that keeps the node table live
pub struct ViewWorker {
    refresh: RefreshConfig,
    command_rx: Receiver<ViewCommand>,
    message_tx: Sender<ViewMessage>,
    running: Arc<AtomicBool>,
    clock: Box<dyn Clock>,
    view: NodesView,
    /// Latest node map from ingestion
    nodes: Arc<NodeMap>,
    head_block: Option<u64>,
    host: HostState,
    /// Bumped on reset and on every full refresh
    generation: u64,
    /// Generation of the last materialization pass
    materialized_generation: Option<u64>,
    /// Inputs of the rows changed since the last pass
    dirty: bool,
    last_tick: Instant,
    last_full_refresh: Instant,
    stats: WorkerStats,
}

impl ViewWorker {
    /// Create a new view worker
    pub fn new(
        config: &DashboardConfig,
        command_rx: Receiver<ViewCommand>,
        message_tx: Sender<ViewMessage>,
        running: Arc<AtomicBool>,
    ) -> crate::Result<Self> {
        let view = NodesView::new(config.layout()?, config.sort.clone());
        let now = Instant::now();
        Ok(Self {
            refresh: config.refresh.clone(),
            command_rx,
            message_tx,
            running,
            clock: Box::new(SystemClock),
            view,
            nodes: Arc::new(NodeMap::new()),
            head_block: None,
            host: HostState::default(),
            generation: 0,
            materialized_generation: None,
            dirty: true,
            last_tick: now,
            last_full_refresh: now,
            stats: WorkerStats::default(),
        })
    }

    /// Replace the wall-clock source
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    pub fn view(&self) -> &NodesView {
        &self.view
    }

    /// Run the main worker loop
    pub fn run(&mut self) {
        tracing::info!("View worker started");

        while self.running.load(Ordering::SeqCst) {
            if self.host.visible && self.last_tick.elapsed() >= self.tick_interval() {
                self.tick();
                self.last_tick = Instant::now();
            }

            let wait = self.tick_interval().saturating_sub(self.last_tick.elapsed());
            match self.command_rx.recv_timeout(wait) {
                Ok(cmd) => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                    if !self.process_commands() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("Command channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        if self.stats.dropped_messages > 0 {
            tracing::warn!(
                "View worker dropped {} messages due to backpressure",
                self.stats.dropped_messages
            );
        }
        let _ = self.message_tx.try_send(ViewMessage::Shutdown);
        tracing::info!(
            ticks = self.stats.ticks,
            passes = self.stats.passes,
            "View worker stopped"
        );
    }

    fn tick_interval(&self) -> Duration {
        if self.host.visible {
            self.refresh.tick_interval(self.host.focused)
        } else {
            // Hidden: only wake up for commands.
            self.refresh.tick_interval(false)
        }
    }

    /// Drain pending commands. Returns `false` when the worker should stop.
    fn process_commands(&mut self) -> bool {
        while let Ok(cmd) = self.command_rx.try_recv() {
            if !self.handle_command(cmd) {
                return false;
            }
        }
        true
    }

    /// Apply one command. Returns `false` when the worker should stop.
    fn handle_command(&mut self, cmd: ViewCommand) -> bool {
        match cmd {
            ViewCommand::UpdateNodes(nodes) => {
                if !Arc::ptr_eq(&nodes, &self.nodes) {
                    self.nodes = nodes;
                    self.dirty = true;
                }
            }
            ViewCommand::SetChainHead(head) => {
                if head != self.head_block {
                    self.head_block = head;
                    self.dirty = true;
                }
            }
            ViewCommand::SetSort(sort) => {
                let unknown = [&sort.active.column, &sort.secondary.column]
                    .into_iter()
                    .find(|column| crate::columns::find(column).is_none());
                if let Some(column) = unknown {
                    tracing::warn!("Ignoring sort by unknown column {:?}", column);
                    let msg = ViewMessage::Error(format!("unknown sort column: {}", column));
                    self.send(msg);
                    return self.running.load(Ordering::SeqCst);
                }
                tracing::debug!(
                    "Sorting by {} {:?}, then {} {:?}",
                    sort.active.column,
                    sort.active.direction,
                    sort.secondary.column,
                    sort.secondary.direction
                );
                if self.view.set_sort(sort) {
                    self.publish_order();
                }
            }
            ViewCommand::SetPinned(pinned) => {
                if self.view.set_pinned(pinned) {
                    self.publish_order();
                }
            }
            ViewCommand::SetColumns(layout) => {
                if self.view.set_layout(layout) {
                    tracing::debug!(
                        "Column layout changed: {:?}",
                        self.view.layout().names().collect::<Vec<_>>()
                    );
                    self.dirty = true;
                }
            }
            ViewCommand::SetHostState(host) => {
                if host != self.host {
                    tracing::debug!(visible = host.visible, focused = host.focused, "Host state changed");
                    self.host = host;
                }
            }
            ViewCommand::Reset => {
                tracing::info!("Reset requested, recomputing all rows");
                self.generation += 1;
                self.dirty = true;
            }
            ViewCommand::RequestSnapshot => {
                if self.view.is_layout_stale() {
                    // Rows must match the column names sent with them.
                    self.materialize();
                }
                let snapshot = ViewSnapshot {
                    rows: Arc::new(self.view.rows().clone()),
                    order: self.view.order_handle(),
                    columns: self.view.layout().names().collect(),
                };
                self.send(ViewMessage::Snapshot(snapshot));
            }
            ViewCommand::Shutdown => {
                tracing::info!("Shutdown requested");
                return false;
            }
        }
        self.running.load(Ordering::SeqCst)
    }

    /// One scheduling tick. Only called while the host is visible.
    fn tick(&mut self) {
        self.stats.ticks += 1;

        if self.last_full_refresh.elapsed() >= self.refresh.full_refresh_interval() {
            self.generation += 1;
            self.last_full_refresh = Instant::now();
        }

        let stale_generation = self.materialized_generation != Some(self.generation);
        if !self.dirty && !stale_generation {
            return;
        }
        self.materialize();
    }

    /// Recompute rows, re-sort and publish what changed
    fn materialize(&mut self) {
        let context = Context {
            head_block: self.head_block,
            now_ms: self.clock.now_ms(),
        };
        let (update, reordered) = self.view.apply_tick(&self.nodes, &context, self.generation);
        self.materialized_generation = Some(self.generation);
        self.dirty = false;
        self.stats.passes += 1;
        self.stats.rows_recomputed += update.recomputed.len() as u64;

        if !update.is_empty() {
            tracing::trace!(
                recomputed = update.recomputed.len(),
                removed = update.removed.len(),
                "Publishing rows"
            );
            self.publish_rows(update);
            self.publish_order();
        } else if reordered {
            self.publish_order();
        }
    }

    fn publish_rows(&mut self, update: RowSetUpdate) {
        let rows = Arc::new(self.view.rows().clone());
        self.send(ViewMessage::Rows { rows, update });
    }

    fn publish_order(&mut self) {
        let order = self.view.order_handle();
        self.send(ViewMessage::Order(order));
    }

    fn send(&mut self, msg: ViewMessage) {
        match self.message_tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.stats.dropped_messages += 1;
            }
            Err(TrySendError::Disconnected(_)) => {
                // Nobody is listening any more; tear down with the view.
                tracing::debug!("View disconnected, stopping worker");
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }
}

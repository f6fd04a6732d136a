//! Thread boundary between the view worker and its clients.
//!
//! Producers (telemetry ingestion, settings UI) push [`ViewCommand`]s; the
//! view drains [`ViewMessage`]s. Both directions are bounded crossbeam
//! channels.

use crate::columns::ColumnLayout;
use crate::config::HostState;
use crate::error::{NetStatsError, Result};
use crate::pipeline::{RowSet, RowSetUpdate, SortDescriptor};
use crate::types::NodeMap;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Commands sent to the view worker.
#[derive(Debug, Clone)]
pub enum ViewCommand {
    /// New node map snapshot from ingestion.
    UpdateNodes(Arc<NodeMap>),
    /// New chain head block number.
    SetChainHead(Option<u64>),
    /// New sort descriptor.
    SetSort(SortDescriptor),
    /// New pinned node set.
    SetPinned(HashSet<String>),
    /// New column layout.
    SetColumns(ColumnLayout),
    /// Host view visibility/focus changed.
    SetHostState(HostState),
    /// Structural reset (e.g. reconnect): recompute every row on the next tick.
    Reset,
    /// Ask for a full snapshot of rows and order.
    RequestSnapshot,
    /// Stop the worker.
    Shutdown,
}

/// Complete state of the view at one instant.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub rows: Arc<RowSet>,
    pub order: Arc<Vec<String>>,
    pub columns: Vec<&'static str>,
}

/// Messages sent from the view worker.
#[derive(Debug, Clone)]
pub enum ViewMessage {
    /// Row set after a materialization pass.
    Rows {
        rows: Arc<RowSet>,
        update: RowSetUpdate,
    },
    /// Display order; always follows the `Rows` message it depends on.
    Order(Arc<Vec<String>>),
    /// Response to `RequestSnapshot`.
    Snapshot(ViewSnapshot),
    /// A command could not be applied.
    Error(String),
    /// Worker is shutting down.
    Shutdown,
}

/// Channel capacity for commands (clients → worker).
const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for messages (worker → view).
const MSG_CHANNEL_CAPACITY: usize = 1024;

/// Client-side handle for talking to the view worker.
pub struct ViewBridge {
    pub cmd_tx: Sender<ViewCommand>,
    pub msg_rx: Receiver<ViewMessage>,
}

impl ViewBridge {
    /// Create a new bridge pair: `(bridge, cmd_rx, msg_tx)`.
    ///
    /// The worker thread owns `cmd_rx` and `msg_tx`.
    pub fn new() -> (Self, Receiver<ViewCommand>, Sender<ViewMessage>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (Self { cmd_tx, msg_rx }, cmd_rx, msg_tx)
    }

    /// Send a command to the worker.
    pub fn send(&self, cmd: ViewCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|e| NetStatsError::Channel(format!("view worker is gone: {}", e)))
    }

    pub fn update_nodes(&self, nodes: NodeMap) -> Result<()> {
        self.send(ViewCommand::UpdateNodes(Arc::new(nodes)))
    }

    pub fn set_chain_head(&self, head: Option<u64>) -> Result<()> {
        self.send(ViewCommand::SetChainHead(head))
    }

    pub fn set_sort(&self, sort: SortDescriptor) -> Result<()> {
        self.send(ViewCommand::SetSort(sort))
    }

    pub fn set_pinned(&self, pinned: HashSet<String>) -> Result<()> {
        self.send(ViewCommand::SetPinned(pinned))
    }

    pub fn set_columns(&self, layout: ColumnLayout) -> Result<()> {
        self.send(ViewCommand::SetColumns(layout))
    }

    pub fn set_host_state(&self, host: HostState) -> Result<()> {
        self.send(ViewCommand::SetHostState(host))
    }

    pub fn reset(&self) -> Result<()> {
        self.send(ViewCommand::Reset)
    }

    pub fn request_snapshot(&self) -> Result<()> {
        self.send(ViewCommand::RequestSnapshot)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(ViewCommand::Shutdown)
    }

    // --- Receiving ---

    /// Drain all pending messages.
    pub fn drain(&self) -> Vec<ViewMessage> {
        self.msg_rx.try_iter().collect()
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<ViewMessage> {
        self.msg_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// Returns an error once the worker has hung up.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ViewMessage>> {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => Ok(Some(msg)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(NetStatsError::Channel("view worker disconnected".to_string()))
            }
        }
    }
}

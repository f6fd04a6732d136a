//! Backend: the view worker thread and its inputs
//!
//! All derivation happens in a separate thread so ingestion and rendering
//! never wait on it. Communication is via crossbeam channels.
//!
//! # Architecture
//!
//! - [`ViewCommand`] - Messages sent to the worker (nodes, sort, pins, ...)
//! - [`ViewMessage`] - Messages sent from the worker (rows, order, snapshots)
//! - [`ViewBridge`] - Client-side handle for sending commands and receiving messages
//! - [`ViewBackend`] - Entry point that owns the worker ends of the channels
//!
//! # Components
//!
//! - [`ViewWorker`] - Main loop that ticks and publishes
//! - [`TelemetryFeed`] / [`JsonFeed`] - Sources of node map snapshots
//! - [`MockFeed`] - Synthetic network for demos (feature-gated)
//! - [`Clock`] - Wall-clock source for per-tick contexts
//!
//! # Example
//!
//! ```no_run
//! use netstats_rs::backend::{ViewBackend, ViewMessage};
//! use netstats_rs::config::DashboardConfig;
//! use netstats_rs::types::NodeMap;
//!
//! let (backend, bridge) = ViewBackend::new(&DashboardConfig::default())?;
//! let worker = std::thread::spawn(move || backend.run());
//!
//! bridge.set_chain_head(Some(100))?;
//! bridge.update_nodes(NodeMap::new())?;
//!
//! for msg in bridge.drain() {
//!     if let ViewMessage::Order(order) = msg {
//!         println!("{} rows", order.len());
//!     }
//! }
//!
//! bridge.shutdown()?;
//! worker.join().ok();
//! # Ok::<(), netstats_rs::NetStatsError>(())
//! ```

pub mod bridge;
pub mod clock;
pub mod feed;
#[cfg(feature = "mock-feed")]
pub mod mock_feed;
pub mod worker;

pub use bridge::{ViewBridge, ViewCommand, ViewMessage, ViewSnapshot};
pub use clock::{Clock, SystemClock};
pub use feed::{open_json_feed, FeedFrame, JsonFeed, TelemetryFeed};
#[cfg(feature = "mock-feed")]
pub use mock_feed::MockFeed;
pub use worker::{ViewWorker, WorkerStats};

use crate::config::DashboardConfig;
use crate::error::{NetStatsError, Result};
use crossbeam_channel::Sender;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// The view backend that runs in a separate thread
pub struct ViewBackend {
    worker: ViewWorker,
    running: Arc<AtomicBool>,
}

impl ViewBackend {
    /// Create a backend and the bridge that talks to it
    pub fn new(config: &DashboardConfig) -> Result<(Self, ViewBridge)> {
        let (bridge, cmd_rx, msg_tx) = ViewBridge::new();
        let running = Arc::new(AtomicBool::new(true));
        let worker = ViewWorker::new(config, cmd_rx, msg_tx, Arc::clone(&running))?;
        Ok((Self { worker, running }, bridge))
    }

    /// Replace the worker's clock before it starts
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.worker = self.worker.with_clock(clock);
        self
    }

    /// Run the worker loop until shutdown; returns its final counters
    pub fn run(mut self) -> WorkerStats {
        self.worker.run();
        self.worker.stats()
    }

    /// Get a handle to stop the backend
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}

/// Pump frames from `feed` into the worker until the feed ends.
///
/// Takes a bare command sender so the feed can run on its own thread while
/// the bridge stays with the view. Stops early when the worker goes away.
/// Returns the number of frames sent.
pub fn pump_feed(
    feed: &mut dyn TelemetryFeed,
    commands: &Sender<ViewCommand>,
    frame_interval: std::time::Duration,
) -> Result<u64> {
    let send = |cmd: ViewCommand| {
        commands
            .send(cmd)
            .map_err(|_| NetStatsError::Channel("view worker is gone".to_string()))
    };
    let mut frames = 0;
    while let Some(frame) = feed.next_frame()? {
        if frame.reset {
            send(ViewCommand::Reset)?;
        }
        send(ViewCommand::SetChainHead(frame.head))?;
        send(ViewCommand::UpdateNodes(frame.nodes))?;
        frames += 1;
        if !frame_interval.is_zero() {
            std::thread::sleep(frame_interval);
        }
    }
    tracing::info!("Feed finished after {} frames", frames);
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_backend_creation() {
        let (backend, bridge) = ViewBackend::new(&DashboardConfig::default()).unwrap();
        assert!(backend.stop_handle().load(Ordering::SeqCst));
        assert!(bridge.shutdown().is_ok());
    }

    #[test]
    fn test_backend_rejects_bad_columns() {
        let config = DashboardConfig {
            columns: vec!["Nope".into()],
            ..Default::default()
        };
        assert!(ViewBackend::new(&config).is_err());
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let (backend, _bridge) = ViewBackend::new(&DashboardConfig::default()).unwrap();
        let stop = backend.stop_handle();
        let handle = std::thread::spawn(move || backend.run());
        stop.store(false, Ordering::SeqCst);
        handle.join().unwrap();
    }

    #[test]
    fn test_pump_json_feed() {
        let text = concat!(
            r#"{"head": 5, "nodes": [{"id": "a"}]}"#,
            "\n",
            r#"{"head": 6, "reset": true, "nodes": [{"id": "a"}]}"#,
            "\n"
        );
        let mut feed = JsonFeed::new(std::io::Cursor::new(text.as_bytes().to_vec()));
        let (bridge, cmd_rx, _msg_tx) = ViewBridge::new();
        let frames = pump_feed(&mut feed, &bridge.cmd_tx, std::time::Duration::ZERO).unwrap();
        assert_eq!(frames, 2);

        let cmds: Vec<_> = cmd_rx.try_iter().collect();
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], ViewCommand::SetChainHead(Some(5))));
        assert!(matches!(cmds[2], ViewCommand::Reset));
    }
}

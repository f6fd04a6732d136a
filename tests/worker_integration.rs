//! Integration tests for the view worker thread
//!
//! Runs the real worker loop on its own thread and drives it through the
//! bridge, the way an application would.

mod common;

use common::builders::NodeBuilder;
use common::mock_helpers::{create_test_backend, fast_config};
use common::{node_map, test_timeout};
use netstats_rs::backend::{ViewBridge, ViewMessage};
use netstats_rs::config::HostState;
use netstats_rs::pipeline::{SortDescriptor, SortKey};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wait for the next message matching `pred`, discarding others
fn wait_for<F>(bridge: &ViewBridge, mut pred: F) -> Option<ViewMessage>
where
    F: FnMut(&ViewMessage) -> bool,
{
    let deadline = Instant::now() + test_timeout();
    while Instant::now() < deadline {
        if let Ok(Some(msg)) = bridge.recv_timeout(Duration::from_millis(10)) {
            if pred(&msg) {
                return Some(msg);
            }
        }
    }
    None
}

fn order_of(msg: Option<ViewMessage>) -> Vec<String> {
    match msg {
        Some(ViewMessage::Order(order)) => (*order).clone(),
        other => panic!("expected order, got {:?}", other),
    }
}

#[test]
fn test_worker_publishes_rows_before_order() {
    let (backend, bridge) = create_test_backend(&fast_config());
    let handle = std::thread::spawn(move || backend.run());

    bridge.set_chain_head(Some(10)).unwrap();
    bridge
        .update_nodes(node_map([
            NodeBuilder::new("a").name("a").block(9).build(),
            NodeBuilder::new("b").name("b").block(10).build(),
        ]))
        .unwrap();

    let first = wait_for(&bridge, |m| {
        matches!(m, ViewMessage::Rows { .. } | ViewMessage::Order(_))
    });
    match first {
        Some(ViewMessage::Rows { rows, .. }) => assert_eq!(rows.len(), 2),
        other => panic!("expected rows first, got {:?}", other),
    }
    let order = order_of(wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))));
    assert_eq!(order, ["b", "a"]);

    bridge.shutdown().unwrap();
    let stats = handle.join().unwrap();
    assert!(stats.passes >= 1);
}

#[test]
fn test_sort_and_pin_commands_reorder() {
    let (backend, bridge) = create_test_backend(&fast_config());
    let handle = std::thread::spawn(move || backend.run());

    bridge
        .update_nodes(node_map([
            NodeBuilder::new("a").peers(1).build(),
            NodeBuilder::new("b").peers(3).build(),
            NodeBuilder::new("c").peers(2).build(),
        ]))
        .unwrap();
    wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))).expect("initial order");

    bridge
        .set_sort(SortDescriptor::new(
            SortKey::descending("Peers"),
            SortKey::ascending("Name"),
        ))
        .unwrap();
    let order = order_of(wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))));
    assert_eq!(order, ["b", "c", "a"]);

    bridge.set_pinned(["a".to_string()].into()).unwrap();
    let order = order_of(wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))));
    assert_eq!(order, ["a", "b", "c"]);

    bridge.shutdown().unwrap();
    handle.join().unwrap();
}

#[test]
fn test_hidden_host_is_silent_until_shown() {
    let (backend, bridge) = create_test_backend(&fast_config());
    bridge.set_host_state(HostState::hidden()).unwrap();
    bridge
        .update_nodes(node_map([NodeBuilder::new("a").build()]))
        .unwrap();
    let handle = std::thread::spawn(move || backend.run());

    std::thread::sleep(Duration::from_millis(50));
    assert!(bridge
        .drain()
        .iter()
        .all(|m| !matches!(m, ViewMessage::Rows { .. } | ViewMessage::Order(_))));

    bridge.set_host_state(HostState::default()).unwrap();
    let order = order_of(wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))));
    assert_eq!(order, ["a"]);

    bridge.shutdown().unwrap();
    handle.join().unwrap();
}

#[test]
fn test_snapshot_reflects_latest_state() {
    let (backend, bridge) = create_test_backend(&fast_config());
    let handle = std::thread::spawn(move || backend.run());

    let nodes = Arc::new(node_map([NodeBuilder::new("x").name("only").build()]));
    bridge
        .send(netstats_rs::ViewCommand::UpdateNodes(nodes))
        .unwrap();
    wait_for(&bridge, |m| matches!(m, ViewMessage::Order(_))).expect("order");

    bridge.request_snapshot().unwrap();
    match wait_for(&bridge, |m| matches!(m, ViewMessage::Snapshot(_))) {
        Some(ViewMessage::Snapshot(snapshot)) => {
            assert_eq!(snapshot.order.as_slice(), ["x"]);
            assert!(snapshot.rows.contains_key("x"));
            assert_eq!(snapshot.columns.first(), Some(&"Status"));
        }
        other => panic!("expected snapshot, got {:?}", other),
    }

    bridge.shutdown().unwrap();
    handle.join().unwrap();
}

#[test]
fn test_dropping_bridge_stops_worker() {
    let (backend, bridge) = create_test_backend(&fast_config());
    let handle = std::thread::spawn(move || backend.run());
    drop(bridge);
    handle.join().unwrap();
}

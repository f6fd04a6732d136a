//! The static column table and the cell functions it refers to.

use super::{CellContext, Column, ColumnKind, Context, RawValue};
use crate::format::{
    color_range, format_number, shorten_address, truncate_name, Severity, NOT_AVAILABLE,
};
use crate::types::NodeSnapshot;

const NUMERIC: &[&str] = &["numeric"];
const ADDRESS: &[&str] = &["address"];

const VALIDATOR_LEVELS: [Option<f64>; 6] = [None, Some(1.0), Some(2.0), None, None, None];
const BLOCK_LAG_LEVELS: [Option<f64>; 5] = [None, Some(0.0), Some(1.0), Some(5.0), Some(30.0)];
const BLOCK_AGE_LEVELS: [Option<f64>; 5] =
    [None, Some(10.0), Some(30.0), Some(60.0), Some(600.0)];
const LATENCY_LEVELS: [Option<f64>; 5] =
    [Some(0.0), Some(10.0), Some(100.0), Some(1000.0), Some(10000.0)];
const PROPAGATION_LEVELS: [Option<f64>; 5] =
    [Some(10.0), Some(100.0), Some(1000.0), Some(10000.0), Some(100000.0)];
const DOWNTIME_LEVELS: [Option<f64>; 6] =
    [None, Some(0.1), Some(1.0), Some(5.0), Some(10.0), Some(20.0)];

static COLUMNS: &[Column] = &[
    Column {
        name: "Status",
        icon: "done",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: status_value,
        show: Some(status_show),
        color: Some(status_color),
        link: None,
        variants: &[],
    },
    Column {
        name: "Name",
        icon: "face",
        kind: ColumnKind::Text,
        visible: true,
        primary: false,
        tiebreak: true,
        accessor: name_value,
        show: Some(name_show),
        color: None,
        link: None,
        variants: &[],
    },
    Column {
        name: "Address",
        icon: "person",
        kind: ColumnKind::Text,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: address_value,
        show: Some(address_show),
        color: None,
        link: Some(address_link),
        variants: ADDRESS,
    },
    Column {
        name: "Validator group",
        icon: "group",
        kind: ColumnKind::Text,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: group_value,
        show: Some(address_show),
        color: None,
        link: Some(address_link),
        variants: ADDRESS,
    },
    Column {
        name: "Validator",
        icon: "done_all",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: validator_value,
        show: Some(validator_show),
        color: Some(validator_color),
        link: None,
        variants: &[],
    },
    Column {
        name: "Peers",
        icon: "people",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: peers_value,
        show: None,
        color: Some(peers_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Pending",
        icon: "hourglass_empty",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: pending_value,
        show: None,
        color: Some(pending_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Block",
        icon: "archive",
        kind: ColumnKind::Number,
        visible: true,
        primary: true,
        tiebreak: false,
        accessor: block_value,
        show: Some(block_show),
        color: Some(block_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Transactions",
        icon: "compare_arrows",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: transactions_value,
        show: None,
        color: None,
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Block Time",
        icon: "timer",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: block_age_value,
        show: Some(block_age_show),
        color: Some(block_age_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Latency",
        icon: "timer",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: latency_value,
        show: Some(latency_show),
        color: Some(latency_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Propagation time",
        icon: "wifi_tethering",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: propagation_value,
        show: Some(propagation_show),
        color: Some(propagation_color),
        link: None,
        variants: NUMERIC,
    },
    Column {
        name: "Uptime",
        icon: "offline_bolt",
        kind: ColumnKind::Number,
        visible: true,
        primary: false,
        tiebreak: false,
        accessor: uptime_value,
        show: Some(uptime_show),
        color: Some(uptime_color),
        link: None,
        variants: NUMERIC,
    },
];

/// Every known column, in default display order
pub fn registry() -> &'static [Column] {
    COLUMNS
}

/// Look up a column by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// The column the table is sorted by until the user picks one
pub fn primary_column() -> &'static Column {
    COLUMNS.iter().find(|c| c.primary).unwrap_or(&COLUMNS[0])
}

/// The column used to order rows the active sort considers equal
pub fn tiebreak_column() -> &'static Column {
    COLUMNS.iter().find(|c| c.tiebreak).unwrap_or(&COLUMNS[0])
}

fn whole_seconds(ms: f64) -> f64 {
    // Halves round up, also for negative ages caused by clock skew.
    (ms / 1000.0 + 0.5).floor()
}

// --- Status ---

fn status_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::from_bool(node.is_active())
}

fn status_show(value: &RawValue, _: &CellContext<'_>) -> String {
    let label = if value.is_truthy() { "online" } else { "offline" };
    label.to_string()
}

fn status_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    if value.is_truthy() {
        Severity::Ok
    } else {
        Severity::Warn3
    }
}

// --- Name / Address / Validator group ---

fn name_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    node.name()
        .map_or(RawValue::Missing, |name| RawValue::Text(name.to_string()))
}

fn name_show(value: &RawValue, _: &CellContext<'_>) -> String {
    match value {
        RawValue::Text(name) => truncate_name(name),
        _ => String::new(),
    }
}

fn address_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Text(node.id.clone())
}

fn group_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    node.affiliation()
        .map_or(RawValue::Missing, |group| RawValue::Text(group.to_string()))
}

fn address_show(value: &RawValue, _: &CellContext<'_>) -> String {
    match value {
        RawValue::Text(address) => shorten_address(address),
        _ => String::new(),
    }
}

fn address_link(value: &RawValue, cx: &CellContext<'_>) -> Option<String> {
    match (value, cx.explorer) {
        (RawValue::Text(address), Some(explorer)) if !address.is_empty() => {
            Some(format!("{explorer}/address/{address}"))
        }
        _ => None,
    }
}

// --- Validator ---

fn validator_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    let registered = u8::from(node.is_registered());
    let elected = u8::from(node.is_elected());
    RawValue::Number(f64::from(registered + (elected << 1)))
}

fn validator_show(value: &RawValue, _: &CellContext<'_>) -> String {
    let label = match value.as_f64() {
        Some(v) if v == 0.0 => "Full Node",
        Some(v) if v == 1.0 => "Registered",
        _ => "Elected",
    };
    label.to_string()
}

fn validator_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    color_range(3.0 - value.number_or_nan(), &VALIDATOR_LEVELS)
}

// --- Peers / Pending / Transactions ---

fn peers_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Number(node.peers() as f64)
}

fn peers_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    if value.is_truthy() {
        Severity::Ok
    } else {
        Severity::No
    }
}

fn pending_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Number(node.pending() as f64)
}

fn pending_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    if value.is_truthy() {
        Severity::Ok
    } else {
        Severity::Info
    }
}

fn transactions_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Number(node.transaction_count() as f64)
}

// --- Block ---

fn block_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    node.block_number()
        .map_or(RawValue::Missing, |n| RawValue::Number(n as f64))
}

fn block_show(value: &RawValue, _: &CellContext<'_>) -> String {
    if value.is_truthy() {
        format!("# {}", format_number(value.number_or_nan(), 0))
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn block_color(value: &RawValue, cx: &CellContext<'_>) -> Severity {
    if !value.is_truthy() {
        return Severity::No;
    }
    // Unknown head makes the lag NaN, which lands past the last level.
    let head = cx.context.head_block.map_or(f64::NAN, |h| h as f64);
    color_range(head - value.number_or_nan(), &BLOCK_LAG_LEVELS)
}

// --- Block Time ---

fn block_age_value(node: &NodeSnapshot, context: &Context) -> RawValue {
    match node.block_received() {
        Some(received) if received != 0 => {
            RawValue::Number(whole_seconds(context.now_ms.saturating_sub(received) as f64))
        }
        _ => RawValue::Number(f64::NEG_INFINITY),
    }
}

fn block_age_show(value: &RawValue, _: &CellContext<'_>) -> String {
    match value.as_f64() {
        Some(age) if age != f64::NEG_INFINITY => format!("{age} s ago"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn block_age_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    match value.as_f64() {
        Some(age) if age != f64::NEG_INFINITY => color_range(age, &BLOCK_AGE_LEVELS),
        _ => Severity::No,
    }
}

// --- Latency ---

fn latency_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Number(node.latency())
}

// The three branches are kept distinct: an exact zero prints "0 ms", any
// other number gets a plus sign, and a non-numeric value prints nothing.
fn latency_show(value: &RawValue, _: &CellContext<'_>) -> String {
    match value.as_f64() {
        Some(latency) if latency == 0.0 => "0 ms".to_string(),
        Some(latency) if value.is_truthy() => format!("+{latency} ms"),
        _ => String::new(),
    }
}

fn latency_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    color_range(value.number_or_nan(), &LATENCY_LEVELS)
}

// --- Propagation time ---

fn propagation_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    RawValue::Number(node.propagation())
}

fn propagation_show(value: &RawValue, cx: &CellContext<'_>) -> String {
    if cx.node.is_active() {
        format!("{value} ms")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn propagation_color(value: &RawValue, cx: &CellContext<'_>) -> Severity {
    if cx.node.is_active() {
        color_range(value.number_or_nan(), &PROPAGATION_LEVELS)
    } else {
        Severity::No
    }
}

// --- Uptime ---

fn uptime_value(node: &NodeSnapshot, _: &Context) -> RawValue {
    node.uptime().map_or(RawValue::Missing, RawValue::Number)
}

fn uptime_show(value: &RawValue, _: &CellContext<'_>) -> String {
    match value {
        RawValue::Number(uptime) => format!("{uptime} %"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn uptime_color(value: &RawValue, _: &CellContext<'_>) -> Severity {
    color_range(100.0 - value.number_or_nan(), &DOWNTIME_LEVELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockInfo, NodeInfo, NodeStats, ValidatorData};

    const NOW_MS: i64 = 1_700_000_000_000;

    fn context(head: Option<u64>) -> Context {
        Context {
            head_block: head,
            now_ms: NOW_MS,
        }
    }

    fn cell(name: &str, node: &NodeSnapshot, ctx: &Context) -> super::super::Cell {
        let cx = CellContext {
            context: ctx,
            node,
            explorer: None,
        };
        find(name).unwrap().cell(node, &cx)
    }

    fn active_node() -> NodeSnapshot {
        NodeSnapshot {
            id: "0xaaaaaaaa00000000bbbbbbbb".into(),
            stats: Some(NodeStats {
                active: true,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_flags() {
        assert_eq!(registry().len(), 13);
        assert_eq!(primary_column().name, "Block");
        assert_eq!(tiebreak_column().name, "Name");
        assert!(find("propagation TIME").is_some());
    }

    #[test]
    fn test_status_cell() {
        let ctx = context(None);
        let online = cell("Status", &active_node(), &ctx);
        assert_eq!(online.value, "online");
        assert_eq!(online.style, Some(Severity::Ok));

        let offline = cell("Status", &NodeSnapshot::new("x"), &ctx);
        assert_eq!(offline.raw, RawValue::Number(0.0));
        assert_eq!(offline.value, "offline");
        assert_eq!(offline.style, Some(Severity::Warn3));
    }

    #[test]
    fn test_name_cell_missing_and_long() {
        let ctx = context(None);
        let missing = cell("Name", &NodeSnapshot::new("x"), &ctx);
        assert_eq!(missing.raw, RawValue::Missing);
        assert_eq!(missing.value, "");
        assert_eq!(missing.style, None);

        let mut node = NodeSnapshot::new("x");
        node.info = Some(NodeInfo {
            name: Some("validator-number-one-frankfurt".into()),
            ..Default::default()
        });
        assert_eq!(cell("Name", &node, &ctx).value, "validator-number-one-...");
    }

    #[test]
    fn test_address_cells_and_links() {
        let ctx = context(None);
        let mut node = NodeSnapshot::new("0x1234567890abcdef1234567890abcdef12345678");
        node.validator_data = Some(ValidatorData {
            affiliation: Some("0xffffffff00000000000000000000000011111111".into()),
            ..Default::default()
        });
        assert_eq!(cell("Address", &node, &ctx).value, "0x12345678...12345678");
        assert_eq!(
            cell("Validator group", &node, &ctx).value,
            "0xffffffff...11111111"
        );

        let cx = CellContext {
            context: &ctx,
            node: &node,
            explorer: Some("https://scan.example"),
        };
        let linked = find("Address").unwrap().cell(&node, &cx);
        assert_eq!(
            linked.link.as_deref(),
            Some("https://scan.example/address/0x1234567890abcdef1234567890abcdef12345678")
        );
        assert_eq!(linked.variants, ADDRESS);

        let no_group = find("Validator group")
            .unwrap()
            .cell(&NodeSnapshot::new("x"), &cx);
        assert_eq!(no_group.value, "");
        assert_eq!(no_group.link, None);
    }

    #[test]
    fn test_validator_levels() {
        let ctx = context(None);
        let mut node = NodeSnapshot::new("v");
        let full = cell("Validator", &node, &ctx);
        assert_eq!(full.value, "Full Node");
        assert_eq!(full.style, Some(Severity::No));

        node.validator_data = Some(ValidatorData {
            registered: true,
            ..Default::default()
        });
        let registered = cell("Validator", &node, &ctx);
        assert_eq!(registered.raw, RawValue::Number(1.0));
        assert_eq!(registered.value, "Registered");
        assert_eq!(registered.style, Some(Severity::Warn1));

        node.stats = Some(NodeStats {
            elected: true,
            ..Default::default()
        });
        let elected = cell("Validator", &node, &ctx);
        assert_eq!(elected.raw, RawValue::Number(3.0));
        assert_eq!(elected.value, "Elected");
        assert_eq!(elected.style, Some(Severity::Ok));
    }

    #[test]
    fn test_peers_and_pending() {
        let ctx = context(None);
        let node = NodeSnapshot::new("p");
        let peers = cell("Peers", &node, &ctx);
        assert_eq!(peers.value, "0");
        assert_eq!(peers.style, Some(Severity::No));
        let pending = cell("Pending", &node, &ctx);
        assert_eq!(pending.style, Some(Severity::Info));

        let mut node = NodeSnapshot::new("p");
        node.pending = Some(7);
        node.stats = Some(NodeStats {
            peers: Some(25),
            ..Default::default()
        });
        assert_eq!(cell("Peers", &node, &ctx).style, Some(Severity::Ok));
        assert_eq!(cell("Pending", &node, &ctx).value, "7");
    }

    #[test]
    fn test_block_lag_severity() {
        let mut node = active_node();
        node.block = Some(BlockInfo {
            number: Some(1_000_000),
            ..Default::default()
        });

        let synced = cell("Block", &node, &context(Some(1_000_000)));
        assert_eq!(synced.value, "# 1,000,000");
        assert_eq!(synced.style, Some(Severity::Ok));

        let behind = cell("Block", &node, &context(Some(1_000_005)));
        assert_eq!(behind.style, Some(Severity::Warn2));

        let far_behind = cell("Block", &node, &context(Some(1_000_100)));
        assert_eq!(far_behind.style, Some(Severity::Warn4));

        let unknown_head = cell("Block", &node, &context(None));
        assert_eq!(unknown_head.style, Some(Severity::Warn4));

        let no_block = cell("Block", &NodeSnapshot::new("b"), &context(Some(10)));
        assert_eq!(no_block.raw, RawValue::Missing);
        assert_eq!(no_block.value, "n/a");
        assert_eq!(no_block.style, Some(Severity::No));
    }

    #[test]
    fn test_block_age() {
        let ctx = context(None);
        let mut node = active_node();
        node.block = Some(BlockInfo {
            number: Some(1),
            received: Some(NOW_MS - 12_400),
            transactions: vec![serde_json::Value::Null; 3],
            ..Default::default()
        });
        let age = cell("Block Time", &node, &ctx);
        assert_eq!(age.raw, RawValue::Number(12.0));
        assert_eq!(age.value, "12 s ago");
        assert_eq!(age.style, Some(Severity::Warn1));
        assert_eq!(cell("Transactions", &node, &ctx).value, "3");

        let unknown = cell("Block Time", &NodeSnapshot::new("b"), &ctx);
        assert_eq!(unknown.raw, RawValue::Number(f64::NEG_INFINITY));
        assert_eq!(unknown.value, "n/a");
        assert_eq!(unknown.style, Some(Severity::No));
    }

    #[test]
    fn test_block_age_with_absurd_timestamp() {
        let ctx = context(None);
        let mut node = active_node();
        node.block = Some(BlockInfo {
            received: Some(i64::MIN),
            ..Default::default()
        });
        let age = cell("Block Time", &node, &ctx);
        assert!(age.raw.as_f64().is_some_and(|a| a > 1e15));
        assert_eq!(age.style, Some(Severity::Warn4));
    }

    #[test]
    fn test_latency_branches() {
        let ctx = context(None);
        let zero = cell("Latency", &NodeSnapshot::new("l"), &ctx);
        assert_eq!(zero.value, "0 ms");
        assert_eq!(zero.style, Some(Severity::Info));

        let mut node = NodeSnapshot::new("l");
        node.stats = Some(NodeStats {
            latency: Some(42.0),
            ..Default::default()
        });
        let some = cell("Latency", &node, &ctx);
        assert_eq!(some.value, "+42 ms");
        assert_eq!(some.style, Some(Severity::Warn1));

        let cx = CellContext {
            context: &ctx,
            node: &node,
            explorer: None,
        };
        assert_eq!(latency_show(&RawValue::Number(f64::NAN), &cx), "");
    }

    #[test]
    fn test_propagation_depends_on_connectivity() {
        let ctx = context(None);
        let mut node = active_node();
        node.block = Some(BlockInfo {
            propagation: Some(250.0),
            ..Default::default()
        });
        let online = cell("Propagation time", &node, &ctx);
        assert_eq!(online.value, "250 ms");
        assert_eq!(online.style, Some(Severity::Warn1));

        node.stats = None;
        let offline = cell("Propagation time", &node, &ctx);
        assert_eq!(offline.value, "n/a");
        assert_eq!(offline.style, Some(Severity::No));
    }

    #[test]
    fn test_uptime() {
        let ctx = context(None);
        let mut node = NodeSnapshot::new("u");
        node.stats = Some(NodeStats {
            uptime: Some(99.5),
            ..Default::default()
        });
        let up = cell("Uptime", &node, &ctx);
        assert_eq!(up.value, "99.5 %");
        assert_eq!(up.style, Some(Severity::Warn1));

        let unknown = cell("Uptime", &NodeSnapshot::new("u"), &ctx);
        assert_eq!(unknown.value, "n/a");
        assert_eq!(unknown.style, Some(Severity::No));
    }
}

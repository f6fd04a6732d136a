//! netstats - Main Entry Point
//!
//! Replays network telemetry (a JSON-lines file, stdin, or the synthetic
//! feed) through the view worker and prints the resulting node table.

use anyhow::{bail, Context as _};
use clap::Parser;
use netstats_rs::{
    backend::{open_json_feed, pump_feed, TelemetryFeed, ViewBackend, ViewMessage, ViewSnapshot},
    config::DashboardConfig,
    format::Severity,
    pipeline::{SortDirection, SortKey},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "netstats", version, about = "Live node table for a blockchain network monitor")]
struct Args {
    /// JSON-lines telemetry file, or `-` for stdin
    feed: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated column names to show
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    descending: bool,

    /// Node id to pin to the top (repeatable)
    #[arg(long)]
    pin: Vec<String>,

    /// Delay between feed frames in milliseconds
    #[arg(long, default_value_t = 100)]
    frame_interval_ms: u64,

    /// Print the table on every order change, not only at the end
    #[arg(long)]
    follow: bool,

    /// Show the severity of each cell next to its value
    #[arg(long)]
    severity: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Simulate this many nodes instead of reading a feed
    #[cfg(feature = "mock-feed")]
    #[arg(long, conflicts_with = "feed")]
    mock_nodes: Option<usize>,

    /// Number of synthetic frames to generate
    #[cfg(feature = "mock-feed")]
    #[arg(long, default_value_t = 50)]
    mock_frames: u64,

    /// Seed of the synthetic feed
    #[cfg(feature = "mock-feed")]
    #[arg(long, default_value_t = 1)]
    mock_seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; the guard flushes the file writer on exit
    let (file_layer, _log_guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "netstats.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,netstats_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    tracing::info!("Starting netstats");

    let config = load_config(&args)?;
    let mut feed = open_feed(&args)?;

    let (backend, bridge) = ViewBackend::new(&config).context("Failed to start view worker")?;
    let worker_handle = std::thread::spawn(move || backend.run());

    let mut settings = config.initial_settings();
    for id in &args.pin {
        settings.pin(id.as_str());
    }
    if !settings.pinned.is_empty() {
        bridge.set_pinned(settings.pinned)?;
    }

    let commands = bridge.cmd_tx.clone();
    let frame_interval = Duration::from_millis(args.frame_interval_ms);
    let feed_handle = std::thread::spawn(move || pump_feed(feed.as_mut(), &commands, frame_interval));

    let mut snapshot_requested = false;
    loop {
        match bridge.recv_timeout(Duration::from_millis(100)) {
            Ok(Some(ViewMessage::Order(order))) if args.follow => {
                tracing::debug!("Order changed ({} rows)", order.len());
                bridge.request_snapshot()?;
            }
            Ok(Some(ViewMessage::Snapshot(snapshot))) => {
                print_table(&snapshot, args.severity);
                if snapshot_requested {
                    break;
                }
            }
            Ok(Some(ViewMessage::Error(e))) => tracing::warn!("View error: {}", e),
            Ok(Some(ViewMessage::Shutdown)) => break,
            Ok(Some(_)) | Ok(None) => {}
            Err(e) => {
                tracing::warn!("{}", e);
                break;
            }
        }

        if !snapshot_requested && feed_handle.is_finished() {
            // Let the worker tick over the last frame before asking.
            std::thread::sleep(config.refresh.tick_interval(true) * 2);
            bridge.request_snapshot()?;
            snapshot_requested = true;
        }
    }

    tracing::info!("Shutting down...");
    let _ = bridge.shutdown();
    match feed_handle.join() {
        Ok(Ok(frames)) => tracing::debug!("Replayed {} frames", frames),
        Ok(Err(e)) => tracing::warn!("Feed stopped: {}", e),
        Err(_) => bail!("feed thread panicked"),
    }
    match worker_handle.join() {
        Ok(stats) => tracing::info!(
            passes = stats.passes,
            rows = stats.rows_recomputed,
            dropped = stats.dropped_messages,
            "Worker finished"
        ),
        Err(_) => bail!("view worker panicked"),
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::load_or_default(),
    };

    if !args.columns.is_empty() {
        config.columns = args.columns.clone();
    }
    if let Some(column) = &args.sort {
        let direction = if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        config.sort.active = SortKey::new(column.clone(), direction);
    }
    config.validate()?;
    Ok(config)
}

fn open_feed(args: &Args) -> anyhow::Result<Box<dyn TelemetryFeed>> {
    #[cfg(feature = "mock-feed")]
    {
        if let Some(nodes) = args.mock_nodes {
            tracing::info!("Simulating {} nodes", nodes);
            let feed = netstats_rs::backend::MockFeed::new(nodes, args.mock_seed)
                .with_limit(args.mock_frames);
            return Ok(Box::new(feed));
        }
    }

    match &args.feed {
        Some(path) => Ok(open_json_feed(path)?),
        None => bail!("no telemetry feed given (pass a file, `-` for stdin, or --mock-nodes)"),
    }
}

fn print_table(snapshot: &ViewSnapshot, severity: bool) {
    let header: Vec<String> = snapshot.columns.iter().map(|c| c.to_string()).collect();
    let mut lines = vec![header];
    for id in snapshot.order.iter() {
        let Some(row) = snapshot.rows.get(id) else {
            continue;
        };
        let line: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match cell.style {
                Some(style) if severity && style != Severity::Info => {
                    format!("{} [{}]", cell.value, style)
                }
                _ => cell.value.clone(),
            })
            .collect();
        lines.push(line);
    }

    let mut widths = vec![0; snapshot.columns.len()];
    for line in &lines {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }
    for line in &lines {
        let text: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{:<width$}", text, width = width))
            .collect();
        println!("{}", text.join("  ").trim_end());
    }
    println!();
}

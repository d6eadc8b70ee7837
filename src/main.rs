use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use patchlink::ble::central::BleTransport;
use patchlink::config::{self, HubConfig};
use patchlink::hub::Hub;
use patchlink::sink::CsvSink;

/// BLE telemetry hub for AirPatch sensor patches.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seconds each scan window stays open.
    #[arg(long, default_value_t = config::DEFAULT_SCAN_WINDOW_SECS)]
    scan_window: u64,

    /// Seconds between rescans for late or power-cycled patches.
    #[arg(long, default_value_t = config::DEFAULT_RESCAN_INTERVAL_SECS)]
    rescan_interval: u64,

    /// Seconds to wait at startup before the first scan.
    #[arg(long, default_value_t = config::DEFAULT_SETTLE_DELAY_SECS)]
    settle: u64,

    /// Device-name prefix to accept (repeatable, case-insensitive).
    /// Defaults to the AirPatch prefixes when omitted.
    #[arg(long = "prefix")]
    prefixes: Vec<String>,

    /// Directory for CSV telemetry logs.
    #[arg(long, default_value = config::DEFAULT_LOG_DIR)]
    log_dir: String,

    /// Records buffered before each flush to disk.
    #[arg(long, default_value_t = config::DEFAULT_FLUSH_EVERY)]
    flush_every: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut hub_config = HubConfig {
        scan_window: Duration::from_secs(args.scan_window),
        rescan_interval: Duration::from_secs(args.rescan_interval),
        settle_delay: Duration::from_secs(args.settle),
        ..HubConfig::default()
    };
    if !args.prefixes.is_empty() {
        hub_config.prefixes = args.prefixes;
    }

    let sink = Arc::new(CsvSink::open(&args.log_dir, args.flush_every)?);
    let transport = BleTransport::new().await?;

    let hub = Hub::new(transport, sink, hub_config);
    hub.run().await
}

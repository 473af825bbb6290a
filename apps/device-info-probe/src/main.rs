use anyhow::Result;
use clap::{Parser, ValueEnum};
use device_info::{
    DeviceInfoConfig, DeviceInformation, HostEnvironmentProvider, SharedDeviceInformation,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Device Info Probe - print the device facts attached to analytics events
#[derive(Parser)]
#[command(name = "device-info-probe")]
#[command(about = "Print the device facts attached to analytics events")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Output shape
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Snapshot fields as named in the data model
    Json,
    /// Flattened `device_info_*` event properties
    Properties,
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Layered config: defaults -> YAML (if provided) -> env (DEVICE_INFO__*)
    let config = DeviceInfoConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let provider = Arc::new(HostEnvironmentProvider::new(&config));
    let snapshot = DeviceInformation::new(provider);
    let shared = SharedDeviceInformation::from_config(snapshot, &config);

    let view = shared.view();
    tracing::info!(os = %view.os, app = %view.app_name, "Device information collected");

    let rendered = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
        OutputFormat::Properties => serde_json::to_string_pretty(&view.event_properties())?,
    };
    println!("{rendered}");

    Ok(())
}

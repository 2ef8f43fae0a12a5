// geoassert: Assert Location characteristic tooling
//
// Index coordinates, build and inspect write payloads, and drive a write
// through the characteristic against the miner on the system bus.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use geoassert_core::ble::{CONFIG_SERVICE_UUID, DEFAULT_RPC_TIMEOUT};
use geoassert_core::{
    decode_request, encode_request, AssertLocationCharacteristic, AssertLocationRequest,
    ChannelNotifier, DbusMinerClient,
};
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geoassert")]
#[command(about = "Assert Location characteristic tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the H3 index of a coordinate
    Index {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Build a hex-encoded write payload
    Encode(RequestArgs),
    /// Decode a hex-encoded write payload
    Decode { payload: String },
    /// Write a hex-encoded payload through the characteristic
    Assert { payload: String },
    /// Show characteristic metadata
    Info,
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct RequestArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    #[arg(long)]
    owner: String,
    #[arg(long, default_value = "1")]
    nonce: u64,
    #[arg(long, default_value = "0")]
    fee: u64,
    #[arg(long, default_value = "0")]
    amount: u64,
    /// Defaults to the owner
    #[arg(long)]
    payer: Option<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load()?;
    let _log_guard = init_logging(&config)?;

    match cli.command {
        Commands::Index { lat, lon } => cmd_index(lat, lon),
        Commands::Encode(args) => cmd_encode(args),
        Commands::Decode { payload } => cmd_decode(&payload),
        Commands::Assert { payload } => cmd_assert(&config, &payload).await,
        Commands::Info => cmd_info(),
        Commands::Config { action } => cmd_config(config, action),
    }
}

fn init_logging(config: &config::Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match &config.log_file {
        Some(log_file) => {
            let path = Path::new(log_file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().context("log_file has no file name")?;

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn cmd_index(lat: f64, lon: f64) -> Result<()> {
    let index = geoassert_core::index(lat, lon)?;
    println!("{}", index);
    Ok(())
}

fn cmd_encode(args: RequestArgs) -> Result<()> {
    let payer = args.payer.unwrap_or_else(|| args.owner.clone());
    let request = AssertLocationRequest {
        lat: args.lat,
        lon: args.lon,
        owner: args.owner,
        nonce: args.nonce,
        fee: args.fee,
        amount: args.amount,
        payer,
    };
    println!("{}", hex::encode(encode_request(&request)));
    Ok(())
}

fn cmd_decode(payload: &str) -> Result<()> {
    let bytes = hex::decode(payload.trim()).context("Payload is not valid hex")?;
    let request = decode_request(&bytes)?;

    println!("{}", "Assert Location Request".bold());
    println!("  Latitude:  {}", request.lat);
    println!("  Longitude: {}", request.lon);
    match geoassert_core::index(request.lat, request.lon) {
        Ok(index) => println!("  H3 index:  {}", index.to_string().bright_cyan()),
        Err(e) => println!("  H3 index:  {}", e.to_string().bright_red()),
    }
    println!("  Owner:     {}", request.owner);
    println!("  Payer:     {}", request.payer);
    println!("  Nonce:     {}", request.nonce);
    println!("  Fee:       {}", request.fee);
    println!("  Amount:    {}", request.amount);
    Ok(())
}

async fn cmd_assert(config: &config::Config, payload: &str) -> Result<()> {
    let bytes = hex::decode(payload.trim()).context("Payload is not valid hex")?;
    tracing::debug!(
        "Writing {} byte payload via {} on {}",
        bytes.len(),
        config.miner.method,
        config.miner.destination
    );

    let miner = Arc::new(DbusMinerClient::system(config.miner.clone()));
    let (notifier, mut notifications) = ChannelNotifier::channel();
    let characteristic = AssertLocationCharacteristic::new(
        config.characteristic_path.clone(),
        miner,
        Arc::new(notifier),
    )
    .with_rpc_timeout(config.rpc_timeout());

    characteristic.start_notify();
    let status = characteristic.write(&bytes).await;
    characteristic.stop_notify();

    match status.token() {
        Some(token) => println!("{} {}", "Status:".bold(), token.bright_yellow()),
        None => println!(
            "{} {}",
            "Transaction:".bold(),
            hex::encode(status.as_bytes()).bright_green()
        ),
    }

    while let Ok(event) = notifications.try_recv() {
        println!("  notify {} <- {}", event.path, render(&event.value));
    }

    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("{}", "Assert Location Characteristic".bold());
    println!("  Service:        {}", CONFIG_SERVICE_UUID);
    println!("  UUID:           {}", AssertLocationCharacteristic::uuid());

    let flags: Vec<_> = AssertLocationCharacteristic::properties()
        .iter()
        .map(|p| p.flag())
        .collect();
    println!("  Flags:          {}", flags.join(", "));
    println!("  RPC timeout:    {:?} (default)", DEFAULT_RPC_TIMEOUT);

    println!("  Descriptors:");
    for descriptor in AssertLocationCharacteristic::descriptors() {
        println!("    0x{:04X}  {}", descriptor.uuid, render(&descriptor.value));
    }
    Ok(())
}

fn cmd_config(mut config: config::Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            println!("{} {} = {}", "✓".green(), key, value);
        }
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Unknown or unset config key: {}", key),
        },
        ConfigAction::List => {
            for (key, value) in config.list() {
                println!("  {:<22} {}", key, value);
            }
        }
    }
    Ok(())
}

/// Printable ASCII as text, anything else as hex
fn render(value: &[u8]) -> String {
    if !value.is_empty() && value.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(value).into_owned()
    } else {
        hex::encode(value)
    }
}

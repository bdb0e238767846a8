//! PC-CLI: Provenance-Chain command line
//!
//! Thin front end over [`ProvenanceRuntime`]. Results are printed to stdout
//! as JSON; logs go to stderr.

mod demo;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use ledger_adapters::RpcLedger;
use pc_02_qr_codec::{PayloadTextDecoder, QrCodecApi, QrCodecService, ReplayFrames};
use pc_runtime::{connect, ProvenanceRuntime, RuntimeConfig};
use provenance_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_types::{Ledger, SessionContext, Stage};

/// PC-CLI: Provenance-Chain command line
#[derive(Parser, Debug)]
#[command(name = "pc-cli")]
#[command(about = "Record and inspect product lifecycles on the supply-chain ledger")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "PC_CONFIG")]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr on exit
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the connected account
    Account,
    /// Register a new product
    Register {
        id: String,
        description: String,
        location: String,
    },
    /// Record the next lifecycle stage
    Advance {
        id: String,
        /// Stage index (0-5) or name, e.g. "in-transit"
        stage: Stage,
        location: String,
        action: String,
    },
    /// Transfer ownership to another account
    Transfer { id: String, new_owner: String },
    /// Show a product and its lifecycle timeline
    Track { id: String },
    /// Track the first product found in a recorded frame stream (one frame per line)
    Scan { frames: PathBuf },
    /// Track the product encoded in an uploaded payload file
    Upload { image: PathBuf },
    /// Print the QR payload for a product id
    QrEncode { id: String },
    /// Print the text carried by a QR payload
    QrDecode { payload: String },
    /// Run a full lifecycle against an in-memory ledger
    Demo,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn open_session(config: &RuntimeConfig) -> Result<SessionContext> {
    let rpc = config
        .ledger
        .rpc_config()
        .context("ledger connection is not configured")?;
    let ledger = RpcLedger::new(rpc).context("failed to create JSON-RPC client")?;
    let shared: Arc<dyn Ledger> = Arc::new(ledger.clone());
    let session = connect(&ledger, shared)
        .await
        .context("failed to connect an account")?;
    Ok(session)
}

async fn run(args: Args) -> Result<()> {
    let config = RuntimeConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let runtime = ProvenanceRuntime::new(&config, Arc::new(PayloadTextDecoder));

    match args.command {
        Command::QrEncode { id } => {
            let payload = runtime.qr_payload(&id)?;
            println!("{}", payload.as_str());
        }
        Command::QrDecode { payload } => {
            let codec = QrCodecService::new(Arc::new(PayloadTextDecoder));
            println!("{}", codec.decode(payload.as_bytes()));
        }
        Command::Demo => demo::run(&config).await?,
        command => {
            let session = open_session(&config).await?;
            debug!(account = %session.account(), "Session ready");

            match command {
                Command::Account => print_json(&session.account())?,
                Command::Register {
                    id,
                    description,
                    location,
                } => print_json(&runtime.register(&session, &id, &description, &location).await?)?,
                Command::Advance {
                    id,
                    stage,
                    location,
                    action,
                } => print_json(
                    &runtime
                        .advance(&session, &id, stage, &location, &action)
                        .await?,
                )?,
                Command::Transfer { id, new_owner } => {
                    print_json(&runtime.transfer(&session, &id, &new_owner).await?)?
                }
                Command::Track { id } => print_json(&runtime.track(&session, &id).await?)?,
                Command::Scan { frames } => {
                    let text = std::fs::read_to_string(&frames)
                        .with_context(|| format!("cannot read {}", frames.display()))?;
                    let capture = runtime.start_capture(ReplayFrames::from_lines(&text));
                    print_json(&runtime.track_scanned(&session, capture).await?)?
                }
                Command::Upload { image } => {
                    let bytes = std::fs::read(&image)
                        .with_context(|| format!("cannot read {}", image.display()))?;
                    print_json(&runtime.track_upload(&session, &bytes).await?)?
                }
                other => anyhow::bail!("{other:?} does not take a session"),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if telemetry.service_name == TelemetryConfig::default().service_name {
        telemetry.service_name = "pc-cli".to_string();
    }
    let _telemetry = init_telemetry(telemetry).context("failed to initialize telemetry")?;

    let show_metrics = args.metrics;
    let result = run(args).await;

    if show_metrics {
        eprintln!("{}", encode_metrics()?);
    }
    result
}

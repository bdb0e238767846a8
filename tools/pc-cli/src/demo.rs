//! Lifecycle walk-through against an in-memory ledger.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use ledger_adapters::InMemoryLedger;
use pc_02_qr_codec::{PayloadTextDecoder, ReplayFrames};
use pc_runtime::{connect, reconnect, ProvenanceRuntime, RuntimeConfig};
use shared_types::{Ledger, Stage};

const MANUFACTURER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const DISTRIBUTOR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

const STEPS: [(Stage, &str, &str); 3] = [
    (Stage::InProduction, "Pune", "Assembly started"),
    (Stage::ReadyToShip, "Pune", "Packed"),
    (Stage::InTransit, "Nhava Sheva", "Loaded on vessel"),
];

pub async fn run(config: &RuntimeConfig) -> Result<()> {
    let ledger = InMemoryLedger::with_account(MANUFACTURER);
    let shared: Arc<dyn Ledger> = Arc::new(ledger.clone());
    let runtime = ProvenanceRuntime::new(config, Arc::new(PayloadTextDecoder));

    let session = connect(&ledger, shared).await?;
    let registration = runtime
        .register(&session, "1001", "Widget", "Mumbai")
        .await
        .context("registration failed")?;
    info!(payload = %registration.qr_payload, "Demo product registered");

    for (stage, location, action) in STEPS {
        runtime
            .advance(&session, "1001", stage, location, action)
            .await
            .with_context(|| format!("advancing to {stage} failed"))?;
    }

    runtime.transfer(&session, "1001", DISTRIBUTOR).await?;

    ledger.switch_account(DISTRIBUTOR);
    let session = reconnect(&session, &ledger).await?;
    runtime
        .advance(&session, "1001", Stage::Delivered, "Rotterdam", "Received")
        .await?;

    let capture = runtime.start_capture(ReplayFrames::from_lines(&registration.qr_payload));
    let view = runtime.track_scanned(&session, capture).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "registration": registration,
            "view": view,
            "block": ledger.block_number(),
        }))?
    );
    Ok(())
}

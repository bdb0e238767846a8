//! Scenarios run against the in-memory ledger through the runtime facade.

pub mod races;
pub mod scenarios;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use ledger_adapters::InMemoryLedger;
    use pc_02_qr_codec::PayloadTextDecoder;
    use pc_runtime::{connect, ProvenanceRuntime, RuntimeConfig};
    use shared_types::{Ledger, SessionContext};

    pub const MANUFACTURER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    pub const DISTRIBUTOR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    pub struct Harness {
        pub ledger: InMemoryLedger,
        pub runtime: ProvenanceRuntime,
        pub session: SessionContext,
    }

    pub async fn harness() -> Harness {
        let ledger = InMemoryLedger::with_account(MANUFACTURER);
        let shared: Arc<dyn Ledger> = Arc::new(ledger.clone());
        let session = connect(&ledger, shared).await.unwrap();
        let runtime =
            ProvenanceRuntime::new(&RuntimeConfig::default(), Arc::new(PayloadTextDecoder));
        Harness {
            ledger,
            runtime,
            session,
        }
    }
}

//! # Ledger Adapters
//!
//! Implementations of the ledger ports from `shared-types`.
//!
//! - [`rpc::RpcLedger`]: an EVM node reached over JSON-RPC. Reads use
//!   `eth_call`, writes use `eth_sendTransaction` with node-side signing, and
//!   finality is observed by polling `eth_getTransactionReceipt`.
//! - [`memory::InMemoryLedger`]: a deterministic simulation of the
//!   supply-chain contract for tests and demo runs.
//! - [`abi`]: the Solidity ABI subset the contract needs.

pub mod abi;
pub mod memory;
pub mod rpc;

pub use abi::AbiError;
pub use memory::InMemoryLedger;
pub use rpc::{RpcConfig, RpcError, RpcLedger};

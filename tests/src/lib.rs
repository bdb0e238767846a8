//! # Provenance-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem scenarios
//!     ├── scenarios.rs  # Register / advance / transfer / track lifecycles
//!     └── races.rs      # Concurrent operations on the same product
//! tests/benches/        # Hot paths of the pure subsystems
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::races
//! cargo bench -p pc-tests
//! ```

pub mod integration;

//! Ports module for the Identifier Sanitizer
//!
//! Defines the inbound (API) port trait.

pub mod inbound;

pub use inbound::IdentifierSanitizerApi;

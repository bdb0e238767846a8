//! Domain module for the Identifier Sanitizer
//!
//! Contains the pure sanitizing rules.

pub mod sanitize;

pub use sanitize::*;

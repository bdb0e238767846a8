//! Domain module for the History Reconstructor

pub mod invariants;

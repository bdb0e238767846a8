//! Algorithms module for the History Reconstructor

pub mod reconstruct;

pub use reconstruct::reconstruct;

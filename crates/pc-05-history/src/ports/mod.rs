//! Ports module for the History Reconstructor

pub mod inbound;

pub use inbound::HistoryReconstructorApi;

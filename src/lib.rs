//! Reelbase - movie metadata ingestion client
//!
//! This library crate exposes the configuration, provider and ingestion
//! layers for the binary and for integration testing.

pub mod config;
pub mod ingest;
pub mod provider;

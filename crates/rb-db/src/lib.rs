//! rb-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models and query modules for media, people,
//! genres and the external identifier store. [`accessors`] layers typed
//! per-namespace identifier accessors over the store, and [`construct`]
//! turns parsed provider value objects into persisted entities.

pub mod accessors;
pub mod construct;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

pub use accessors::HasExternalIdentifiers;
pub use construct::{ConstructOptions, ReusePolicy};

//! rb-core: shared types, IDs, errors and transient API value objects.
//!
//! This crate is the foundational dependency for the other reelbase crates,
//! providing type-safe identifiers, a unified error type, the external
//! identifier namespaces and their validation rules, content ratings, and
//! the value objects produced by parsing provider responses.

pub mod api;
pub mod error;
pub mod ids;
pub mod media;
pub mod namespace;

// Re-export the most commonly used items at the crate root.
pub use api::{ApiGenre, ApiId, ApiMedia, ApiPerson};
pub use error::{Error, Result};
pub use ids::*;
pub use media::{IntoRating, IntoReleaseDate, Rating};
pub use namespace::{IdInput, Namespace, Owner, OwnerKind};

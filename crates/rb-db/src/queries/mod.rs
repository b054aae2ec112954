//! Database query modules.

pub mod genres;
pub mod identifiers;
pub mod media;
pub mod people;
pub mod settings;

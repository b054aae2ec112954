//! Transient value objects produced by parsing a provider response.
//!
//! These shapes are never persisted; each one is consumed once to construct
//! a domain entity. Every container is owned by its instance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::namespace::Namespace;

/// A `(namespace, value)` pair exactly as the provider supplied it.
///
/// The namespace stays a raw string until the pair is written, so an
/// unknown provider name surfaces as an error at persistence time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiId {
    pub ns: String,
    pub value: String,
}

impl ApiId {
    pub fn new(ns: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            ns: ns.into(),
            value: value.to_string(),
        }
    }

    pub fn tmdb(value: impl fmt::Display) -> Self {
        Self::new(Namespace::Tmdb.as_str(), value)
    }

    pub fn imdb(value: impl fmt::Display) -> Self {
        Self::new(Namespace::Imdb.as_str(), value)
    }

    /// Resolve the raw namespace name.
    pub fn namespace(&self) -> Result<Namespace> {
        self.ns.parse()
    }

    /// Stand-in values a provider emits when it has no real id
    /// (`0` for tmdb, `tt0000000` for imdb).
    pub fn is_placeholder(&self) -> bool {
        self.value == "0" || self.value == "tt0000000"
    }
}

/// A person credited on a title (actor or director).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiPerson {
    pub name: String,
    /// Job as reported by the provider, e.g. "Actor" or "Director".
    pub role: String,
    pub ids: Vec<ApiId>,
}

/// A genre label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiGenre {
    pub name: String,
    pub ids: Vec<ApiId>,
}

/// A movie or episode as described by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMedia {
    pub title: String,
    pub description: String,
    /// Release date text, expected as `YYYY-MM-DD`.
    pub released: Option<String>,
    /// Runtime in minutes.
    pub runtime: i64,
    /// Rating literal, e.g. "PG-13".
    pub rating: String,
    pub genres: Vec<ApiGenre>,
    pub actors: Vec<ApiPerson>,
    /// Directors in billing order; the first one becomes the media's director.
    pub director: Vec<ApiPerson>,
    pub ids: Vec<ApiId>,
    pub poster_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn api_id_stringifies_value() {
        let id = ApiId::tmdb(603);
        assert_eq!(id.ns, "tmdb");
        assert_eq!(id.value, "603");
        assert_eq!(id.namespace().unwrap(), Namespace::Tmdb);
    }

    #[test]
    fn api_id_unknown_namespace() {
        let id = ApiId::new("allocine", "123");
        assert!(matches!(id.namespace(), Err(Error::UnrecognizedNamespace(_))));
    }

    #[test]
    fn placeholders() {
        assert!(ApiId::tmdb(0).is_placeholder());
        assert!(ApiId::imdb("tt0000000").is_placeholder());
        assert!(!ApiId::tmdb(603).is_placeholder());
    }

    #[test]
    fn containers_are_per_instance() {
        let mut a = ApiMedia::default();
        let b = ApiMedia::default();
        a.actors.push(ApiPerson::default());
        a.ids.push(ApiId::imdb("tt0133093"));
        assert!(b.actors.is_empty());
        assert!(b.ids.is_empty());
    }
}

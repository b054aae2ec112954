//! Metadata sources.
//!
//! A [`MetadataSource`] turns a lookup term into transient value objects.
//! [`tmdb::TmdbClient`] is the only implementation.

pub mod tmdb;

use async_trait::async_trait;
use rb_core::{ApiGenre, ApiMedia, Result};

pub use tmdb::{select_poster, ApiMethod, Domain, PosterImage, TmdbClient};

/// What to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTerm {
    /// A title or an IMDB id. Underscores are read as spaces.
    Text(String),
    /// A numeric TMDB movie id.
    TmdbId(i64),
    /// The provider's full genre list.
    GenreList,
}

impl LookupTerm {
    /// Build a term from command-line input. Free text is always searched
    /// (or resolved as an IMDB id); a numeric TMDB id must be given
    /// explicitly.
    pub fn from_cli(text: Option<&str>, tmdb_id: Option<i64>) -> Option<Self> {
        match (tmdb_id, text) {
            (Some(id), _) => Some(Self::TmdbId(id)),
            (None, Some(text)) => Some(Self::from(text)),
            (None, None) => None,
        }
    }
}

impl From<&str> for LookupTerm {
    fn from(text: &str) -> Self {
        Self::Text(text.replace('_', " "))
    }
}

impl From<i64> for LookupTerm {
    fn from(id: i64) -> Self {
        Self::TmdbId(id)
    }
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short, lowercase identifier for this source (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Resolve `term` to zero or more fully described media.
    async fn lookup(&self, term: &LookupTerm) -> Result<Vec<ApiMedia>>;

    /// The full genre list.
    async fn genres(&self) -> Result<Vec<ApiGenre>>;
}

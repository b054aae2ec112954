//! External identifier namespaces, identifier owners, and per-namespace
//! validation rules.
//!
//! A [`Namespace`] names an external data provider whose identifiers are
//! tracked. An [`Owner`] is the tagged reference from an identifier to the
//! single entity that holds it.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{GenreId, MediaId, PersonId};

static TMDB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid tmdb id pattern"));

/// Lowercase only: `TT0133093` is not an IMDB id.
static IMDB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}[0-9]{7}$").expect("valid imdb id pattern"));

/// Returns `true` if `value` has the canonical IMDB id shape (`tt0133093`).
pub fn is_imdb_id(value: &str) -> bool {
    IMDB_ID_RE.is_match(value)
}

/// Returns `true` if `value` is a non-empty run of ASCII digits.
pub fn is_tmdb_id(value: &str) -> bool {
    TMDB_ID_RE.is_match(value)
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// External provider namespace. The integer codes are the persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Tmdb,
    Imdb,
    Tvdb,
}

impl Namespace {
    /// All namespaces in code order.
    pub const ALL: [Namespace; 3] = [Namespace::Tmdb, Namespace::Imdb, Namespace::Tvdb];

    /// Integer code stored in the database.
    pub fn code(self) -> i64 {
        match self {
            Self::Tmdb => 0,
            Self::Imdb => 1,
            Self::Tvdb => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tmdb => "tmdb",
            Self::Imdb => "imdb",
            Self::Tvdb => "tvdb",
        }
    }

    /// Validate and normalize a value for this namespace.
    ///
    /// - `tmdb` takes an integer or an all-digit string.
    /// - `imdb` takes only a string of two letters followed by seven digits.
    /// - `tvdb` takes anything; the value is only stringified.
    pub fn normalize(self, input: IdInput) -> Result<String> {
        match (self, input) {
            (Self::Tmdb, IdInput::Int(n)) => Ok(n.to_string()),
            (Self::Tmdb, IdInput::Text(s)) if is_tmdb_id(&s) => Ok(s),
            (Self::Tmdb, other) => Err(Error::validation(format!(
                "TMDB IDs must be integers. {other}"
            ))),
            (Self::Imdb, IdInput::Text(s)) if is_imdb_id(&s) => Ok(s),
            (Self::Imdb, _) => Err(Error::validation(
                "IMDB IDs must be in the form of two letters followed by seven digits",
            )),
            // tvdb ids are never pattern-checked
            (Self::Tvdb, other) => Ok(other.to_string()),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmdb" => Ok(Self::Tmdb),
            "imdb" => Ok(Self::Imdb),
            "tvdb" => Ok(Self::Tvdb),
            _ => Err(Error::UnrecognizedNamespace(s.to_string())),
        }
    }
}

impl TryFrom<i64> for Namespace {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.code() == code)
            .ok_or_else(|| Error::UnrecognizedNamespace(code.to_string()))
    }
}

// ---------------------------------------------------------------------------
// IdInput
// ---------------------------------------------------------------------------

/// A raw identifier value as handed to a setter, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdInput {
    Int(i64),
    Text(String),
}

impl fmt::Display for IdInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for IdInput {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for IdInput {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for IdInput {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for IdInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for IdInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for IdInput {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

// ---------------------------------------------------------------------------
// OwnerKind / Owner
// ---------------------------------------------------------------------------

/// The kind of entity that can hold external identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Person,
    Media,
    Genre,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Media => "media",
            Self::Genre => "genre",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "media" => Ok(Self::Media),
            "genre" => Ok(Self::Genre),
            _ => Err(Error::validation(format!("unknown owner kind: {s}"))),
        }
    }
}

/// Tagged reference to the entity that holds an external identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Owner {
    Person(PersonId),
    Media(MediaId),
    Genre(GenreId),
}

impl Owner {
    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Person(_) => OwnerKind::Person,
            Self::Media(_) => OwnerKind::Media,
            Self::Genre(_) => OwnerKind::Genre,
        }
    }

    /// The owner's id in its persisted text form.
    pub fn id_string(&self) -> String {
        match self {
            Self::Person(id) => id.to_string(),
            Self::Media(id) => id.to_string(),
            Self::Genre(id) => id.to_string(),
        }
    }

    /// Rebuild an owner from its persisted `(kind, id)` columns.
    pub fn from_parts(kind: OwnerKind, id: &str) -> Result<Self> {
        let bad = |e: uuid::Error| Error::Internal(format!("invalid {kind} id {id}: {e}"));
        Ok(match kind {
            OwnerKind::Person => Self::Person(id.parse().map_err(bad)?),
            OwnerKind::Media => Self::Media(id.parse().map_err(bad)?),
            OwnerKind::Genre => Self::Genre(id.parse().map_err(bad)?),
        })
    }
}

impl From<PersonId> for Owner {
    fn from(id: PersonId) -> Self {
        Self::Person(id)
    }
}

impl From<MediaId> for Owner {
    fn from(id: MediaId) -> Self {
        Self::Media(id)
    }
}

impl From<GenreId> for Owner {
    fn from(id: GenreId) -> Self {
        Self::Genre(id)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_by_name_and_code() {
        assert_eq!("tmdb".parse::<Namespace>().unwrap(), Namespace::Tmdb);
        assert_eq!("IMDB".parse::<Namespace>().unwrap(), Namespace::Imdb);
        assert_eq!(Namespace::try_from(2).unwrap(), Namespace::Tvdb);
        for ns in Namespace::ALL {
            assert_eq!(Namespace::try_from(ns.code()).unwrap(), ns);
        }
    }

    #[test]
    fn unknown_namespace_is_rejected() {
        assert!(matches!(
            "omdb".parse::<Namespace>(),
            Err(Error::UnrecognizedNamespace(_))
        ));
        assert!(matches!(
            Namespace::try_from(3),
            Err(Error::UnrecognizedNamespace(_))
        ));
        assert!(matches!(
            Namespace::try_from(-1),
            Err(Error::UnrecognizedNamespace(_))
        ));
    }

    #[test]
    fn tmdb_accepts_integers_and_digit_strings() {
        assert_eq!(Namespace::Tmdb.normalize(603.into()).unwrap(), "603");
        assert_eq!(Namespace::Tmdb.normalize("603".into()).unwrap(), "603");
        for bad in ["", "60a3", "tt0133093", " 603", "-5"] {
            let err = Namespace::Tmdb.normalize(bad.into()).unwrap_err();
            assert!(
                err.to_string().contains("TMDB IDs must be integers"),
                "{bad:?} -> {err}"
            );
        }
    }

    #[test]
    fn imdb_requires_canonical_shape() {
        assert_eq!(
            Namespace::Imdb.normalize("tt0133093".into()).unwrap(),
            "tt0133093"
        );
        for bad in ["tt013309", "tt01330931", "t0133093", "0133093", "xtt0133093"] {
            assert!(
                matches!(Namespace::Imdb.normalize(bad.into()), Err(Error::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            Namespace::Imdb.normalize(133093.into()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn tvdb_takes_anything() {
        assert_eq!(Namespace::Tvdb.normalize(81189.into()).unwrap(), "81189");
        assert_eq!(
            Namespace::Tvdb.normalize("breaking-bad".into()).unwrap(),
            "breaking-bad"
        );
    }

    #[test]
    fn owner_parts_roundtrip() {
        let owner = Owner::Person(PersonId::new());
        let back = Owner::from_parts(owner.kind(), &owner.id_string()).unwrap();
        assert_eq!(owner, back);
        assert!(Owner::from_parts(OwnerKind::Genre, "not-a-uuid").is_err());
    }

    #[test]
    fn imdb_pattern_helper() {
        assert!(is_imdb_id("tt0133093"));
        assert!(!is_imdb_id("The Matrix"));
        assert!(!is_imdb_id("TT0133093"));
    }
}

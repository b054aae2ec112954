//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use chrono::NaiveDate;
use rb_core::{ExternalIdId, GenreId, MediaId, Namespace, Owner, OwnerKind, PersonId, Rating};
use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_err(
    idx: usize,
    ty: rusqlite::types::Type,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s)
        .map_err(|e| conversion_err(idx, rusqlite::types::Type::Text, e))?;
    Ok(T::from(uuid))
}

fn parse_opt_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => {
            let uuid = Uuid::parse_str(&v)
                .map_err(|e| conversion_err(idx, rusqlite::types::Type::Text, e))?;
            Ok(Some(T::from(uuid)))
        }
        None => Ok(None),
    }
}

fn parse_opt_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|v| {
        NaiveDate::parse_from_str(&v, "%Y-%m-%d")
            .map_err(|e| conversion_err(idx, rusqlite::types::Type::Text, e))
    })
    .transpose()
}

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub job: String,
    pub created_at: String,
}

impl Person {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            job: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub created_at: String,
}

impl Genre {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    pub id: MediaId,
    pub title: String,
    pub description: String,
    pub released: Option<NaiveDate>,
    /// Runtime in minutes.
    pub runtime: i64,
    pub rating: Rating,
    pub director_id: Option<PersonId>,
    pub poster_remote_uri: String,
    pub poster_local_uri: String,
    pub file_uri: String,
    pub created_at: String,
}

impl Media {
    /// Build from a row selected as:
    /// id, title, description, released, runtime, rating, director_id,
    /// poster_remote_uri, poster_local_uri, file_uri, created_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let rating_code: i64 = row.get(5)?;
        let rating = Rating::try_from(rating_code)
            .map_err(|e| conversion_err(5, rusqlite::types::Type::Integer, e))?;
        Ok(Self {
            id: parse_id(row, 0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            released: parse_opt_date(row, 3)?,
            runtime: row.get(4)?,
            rating,
            director_id: parse_opt_id(row, 6)?,
            poster_remote_uri: row.get(7)?,
            poster_local_uri: row.get(8)?,
            file_uri: row.get(9)?,
            created_at: row.get(10)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ExternalIdentifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalIdentifier {
    pub id: ExternalIdId,
    pub namespace: Namespace,
    pub value: String,
    pub owner: Owner,
}

impl ExternalIdentifier {
    /// Build from a row selected as: id, namespace, value, owner_kind, owner_id
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let ns_code: i64 = row.get(1)?;
        let namespace = Namespace::try_from(ns_code)
            .map_err(|e| conversion_err(1, rusqlite::types::Type::Integer, e))?;
        let kind: String = row.get(3)?;
        let kind: OwnerKind = kind
            .parse()
            .map_err(|e| conversion_err(3, rusqlite::types::Type::Text, e))?;
        let owner_id: String = row.get(4)?;
        let owner = Owner::from_parts(kind, &owner_id)
            .map_err(|e| conversion_err(4, rusqlite::types::Type::Text, e))?;
        Ok(Self {
            id: parse_id(row, 0)?,
            namespace,
            value: row.get(2)?,
            owner,
        })
    }
}

// ---------------------------------------------------------------------------
// Setting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            value: row.get(1)?,
        })
    }
}

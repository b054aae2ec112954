//! Genre CRUD and identifier lookups.

use chrono::Utc;
use rb_core::{Error, GenreId, Namespace, Owner, OwnerKind, Result};
use rusqlite::Connection;

use crate::models::Genre;
use crate::queries::identifiers;

const COLS: &str = "id, name, created_at";

/// Create a new genre.
pub fn create_genre(conn: &Connection, name: &str) -> Result<Genre> {
    let id = GenreId::new();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO genres (id, name, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![id.to_string(), name, created_at],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Genre {
        id,
        name: name.to_string(),
        created_at,
    })
}

/// Get a genre by ID.
pub fn get_genre(conn: &Connection, id: GenreId) -> Result<Option<Genre>> {
    let q = format!("SELECT {COLS} FROM genres WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], Genre::from_row);
    match result {
        Ok(g) => Ok(Some(g)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all genres ordered by name.
pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>> {
    let q = format!("SELECT {COLS} FROM genres ORDER BY name, created_at");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Genre::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Genres holding `(namespace, value)`, oldest first.
pub fn find_by_identifier(
    conn: &Connection,
    namespace: Namespace,
    value: &str,
) -> Result<Vec<Genre>> {
    let owners = identifiers::find_owners(conn, OwnerKind::Genre, namespace, value)?;
    let mut found = Vec::with_capacity(owners.len());
    for owner in owners {
        if let Owner::Genre(id) = owner {
            if let Some(g) = get_genre(conn, id)? {
                found.push(g);
            }
        }
    }
    Ok(found)
}

/// Delete a genre (cascades to identifiers and media links).
pub fn delete_genre(conn: &Connection, id: GenreId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM genres WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

//! Media CRUD, validated field setters, and cast/genre relations.

use chrono::{NaiveDate, Utc};
use rb_core::{
    Error, GenreId, IntoRating, IntoReleaseDate, MediaId, Namespace, Owner, OwnerKind, PersonId,
    Rating, Result,
};
use rusqlite::Connection;

use crate::models::{Genre, Media, Person};
use crate::queries::identifiers;

/// Column list used in SELECT statements.
const COLS: &str = "id, title, description, released, runtime, rating, director_id,
    poster_remote_uri, poster_local_uri, file_uri, created_at";

/// Same columns, qualified for joins against `media m`.
const M_COLS: &str = "m.id, m.title, m.description, m.released, m.runtime, m.rating,
    m.director_id, m.poster_remote_uri, m.poster_local_uri, m.file_uri, m.created_at";

/// Field values for a new media row.
#[derive(Debug, Clone, Default)]
pub struct NewMedia {
    pub title: String,
    pub description: String,
    pub released: Option<NaiveDate>,
    pub runtime: i64,
    pub rating: Rating,
    pub director_id: Option<PersonId>,
    pub poster_remote_uri: String,
}

fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Create a new media row.
pub fn create_media(conn: &Connection, new: &NewMedia) -> Result<Media> {
    let id = MediaId::new();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO media (id, title, description, released, runtime, rating, director_id,
            poster_remote_uri, created_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        rusqlite::params![
            id.to_string(),
            new.title,
            new.description,
            date_text(new.released),
            new.runtime,
            new.rating.code(),
            new.director_id.map(|d| d.to_string()),
            new.poster_remote_uri,
            created_at,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Media {
        id,
        title: new.title.clone(),
        description: new.description.clone(),
        released: new.released,
        runtime: new.runtime,
        rating: new.rating,
        director_id: new.director_id,
        poster_remote_uri: new.poster_remote_uri.clone(),
        poster_local_uri: String::new(),
        file_uri: String::new(),
        created_at,
    })
}

/// Get a media row by ID.
pub fn get_media(conn: &Connection, id: MediaId) -> Result<Option<Media>> {
    let q = format!("SELECT {COLS} FROM media WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], Media::from_row);
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all media ordered by title.
pub fn list_media(conn: &Connection) -> Result<Vec<Media>> {
    let q = format!("SELECT {COLS} FROM media ORDER BY title, created_at");
    query_media(conn, &q, [])
}

/// Media holding `(namespace, value)`, oldest first.
pub fn find_by_identifier(
    conn: &Connection,
    namespace: Namespace,
    value: &str,
) -> Result<Vec<Media>> {
    let owners = identifiers::find_owners(conn, OwnerKind::Media, namespace, value)?;
    let mut found = Vec::with_capacity(owners.len());
    for owner in owners {
        if let Owner::Media(id) = owner {
            if let Some(m) = get_media(conn, id)? {
                found.push(m);
            }
        }
    }
    Ok(found)
}

/// Delete a media row (cascades to identifiers and relation rows).
pub fn delete_media(conn: &Connection, id: MediaId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM media WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

fn query_media<P: rusqlite::Params>(conn: &Connection, q: &str, params: P) -> Result<Vec<Media>> {
    let mut stmt = conn.prepare(q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(params, Media::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Run a single-row UPDATE on `media`, failing with `NotFound` when no row matched.
fn update_one(
    conn: &Connection,
    id: MediaId,
    sql: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<()> {
    let n = conn
        .execute(sql, rusqlite::params![value, id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Err(Error::not_found("media", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validated setters
// ---------------------------------------------------------------------------

/// Set the rating from a [`Rating`], its literal, or its integer code.
pub fn set_rating(conn: &Connection, id: MediaId, rating: impl IntoRating) -> Result<Rating> {
    let rating = rating.into_rating()?;
    update_one(conn, id, "UPDATE media SET rating = ?1 WHERE id = ?2", &rating.code())?;
    Ok(rating)
}

/// Set the release date from a date or a `YYYY-MM-DD` string.
pub fn set_released(
    conn: &Connection,
    id: MediaId,
    released: impl IntoReleaseDate,
) -> Result<NaiveDate> {
    let date = released.into_release_date()?;
    update_one(
        conn,
        id,
        "UPDATE media SET released = ?1 WHERE id = ?2",
        &date_text(Some(date)),
    )?;
    Ok(date)
}

pub fn set_director(conn: &Connection, id: MediaId, director: Option<PersonId>) -> Result<()> {
    update_one(
        conn,
        id,
        "UPDATE media SET director_id = ?1 WHERE id = ?2",
        &director.map(|d| d.to_string()),
    )
}

pub fn set_poster_local_uri(conn: &Connection, id: MediaId, uri: &str) -> Result<()> {
    update_one(conn, id, "UPDATE media SET poster_local_uri = ?1 WHERE id = ?2", &uri)
}

pub fn set_file_uri(conn: &Connection, id: MediaId, uri: &str) -> Result<()> {
    update_one(conn, id, "UPDATE media SET file_uri = ?1 WHERE id = ?2", &uri)
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Link an actor to a media row. Linking twice is a no-op.
pub fn add_actor(conn: &Connection, media_id: MediaId, person_id: PersonId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO media_actors (media_id, person_id) VALUES (?1, ?2)",
        [media_id.to_string(), person_id.to_string()],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

pub fn remove_actor(conn: &Connection, media_id: MediaId, person_id: PersonId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM media_actors WHERE media_id = ?1 AND person_id = ?2",
            [media_id.to_string(), person_id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Actors linked to a media row, ordered by name.
pub fn list_actors(conn: &Connection, media_id: MediaId) -> Result<Vec<Person>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.name, p.job, p.created_at FROM people p
             JOIN media_actors ma ON ma.person_id = p.id
             WHERE ma.media_id = ?1 ORDER BY p.name",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([media_id.to_string()], Person::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Link a genre to a media row. Linking twice is a no-op.
pub fn add_genre(conn: &Connection, media_id: MediaId, genre_id: GenreId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO media_genres (media_id, genre_id) VALUES (?1, ?2)",
        [media_id.to_string(), genre_id.to_string()],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

pub fn remove_genre(conn: &Connection, media_id: MediaId, genre_id: GenreId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM media_genres WHERE media_id = ?1 AND genre_id = ?2",
            [media_id.to_string(), genre_id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Genres linked to a media row, ordered by name.
pub fn list_genres(conn: &Connection, media_id: MediaId) -> Result<Vec<Genre>> {
    let mut stmt = conn
        .prepare(
            "SELECT g.id, g.name, g.created_at FROM genres g
             JOIN media_genres mg ON mg.genre_id = g.id
             WHERE mg.media_id = ?1 ORDER BY g.name",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([media_id.to_string()], Genre::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Media a person acts in.
pub fn media_for_actor(conn: &Connection, person_id: PersonId) -> Result<Vec<Media>> {
    let q = format!(
        "SELECT {M_COLS} FROM media m
         JOIN media_actors ma ON ma.media_id = m.id
         WHERE ma.person_id = ?1 ORDER BY m.title"
    );
    query_media(conn, &q, [person_id.to_string()])
}

/// Media a person directed.
pub fn media_for_director(conn: &Connection, person_id: PersonId) -> Result<Vec<Media>> {
    let q = format!("SELECT {COLS} FROM media WHERE director_id = ?1 ORDER BY title");
    query_media(conn, &q, [person_id.to_string()])
}

/// Media classified under a genre.
pub fn media_for_genre(conn: &Connection, genre_id: GenreId) -> Result<Vec<Media>> {
    let q = format!(
        "SELECT {M_COLS} FROM media m
         JOIN media_genres mg ON mg.media_id = m.id
         WHERE mg.genre_id = ?1 ORDER BY m.title"
    );
    query_media(conn, &q, [genre_id.to_string()])
}

//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rb_core::{Error, Result};
use rusqlite::Connection;

/// V1: people, genres, media, their junction tables and the external
/// identifier table.
///
/// `external_ids` points at its owner through a `(owner_kind, owner_id)`
/// pair rather than one foreign key per owner table, so owner deletion is
/// propagated by triggers instead of `ON DELETE CASCADE`.
const V1_INITIAL: &str = r#"
CREATE TABLE people (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL DEFAULT '',
    job        TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE genres (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE media (
    id                TEXT PRIMARY KEY,
    title             TEXT NOT NULL DEFAULT '',
    description       TEXT NOT NULL DEFAULT '',
    released          TEXT,
    runtime           INTEGER NOT NULL DEFAULT 0,
    rating            INTEGER NOT NULL DEFAULT 5 CHECK (rating BETWEEN 0 AND 14),
    director_id       TEXT REFERENCES people(id) ON DELETE SET NULL,
    poster_remote_uri TEXT NOT NULL DEFAULT '',
    poster_local_uri  TEXT NOT NULL DEFAULT '',
    file_uri          TEXT NOT NULL DEFAULT '',
    created_at        TEXT NOT NULL
);

CREATE TABLE media_actors (
    media_id  TEXT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
    person_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
    PRIMARY KEY (media_id, person_id)
);

CREATE TABLE media_genres (
    media_id TEXT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
    genre_id TEXT NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    PRIMARY KEY (media_id, genre_id)
);

CREATE TABLE external_ids (
    id         TEXT PRIMARY KEY,
    namespace  INTEGER NOT NULL CHECK (namespace IN (0, 1, 2)),
    value      TEXT NOT NULL,
    owner_kind TEXT NOT NULL CHECK (owner_kind IN ('person', 'media', 'genre')),
    owner_id   TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_external_ids_owner_ns ON external_ids(owner_kind, owner_id, namespace);
CREATE INDEX idx_external_ids_value           ON external_ids(namespace, value);
CREATE INDEX idx_media_director               ON media(director_id);
CREATE INDEX idx_media_actors_person          ON media_actors(person_id);
CREATE INDEX idx_media_genres_genre           ON media_genres(genre_id);

CREATE TRIGGER trg_people_delete_ids AFTER DELETE ON people
BEGIN
    DELETE FROM external_ids WHERE owner_kind = 'person' AND owner_id = OLD.id;
END;

CREATE TRIGGER trg_genres_delete_ids AFTER DELETE ON genres
BEGIN
    DELETE FROM external_ids WHERE owner_kind = 'genre' AND owner_id = OLD.id;
END;

CREATE TRIGGER trg_media_delete_ids AFTER DELETE ON media
BEGIN
    DELETE FROM external_ids WHERE owner_kind = 'media' AND owner_id = OLD.id;
END;
"#;

/// V2: key/value settings table.
const V2_SETTINGS: &str = r#"
CREATE TABLE settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_SETTINGS)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit()
            .map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(version, "applied migration");
    }

    Ok(())
}

//! Domain entity construction from parsed provider value objects.
//!
//! Each public function runs in its own transaction: either the entity,
//! its identifiers and all linked rows are written, or nothing is.

use rb_core::{ApiGenre, ApiId, ApiMedia, ApiPerson, Error, Owner, OwnerKind, Rating, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::models::{Genre, Media, Person};
use crate::queries::{genres, identifiers, media, people};

/// What to do when a value object describes an entity that may already
/// exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReusePolicy {
    /// Always insert fresh rows.
    AlwaysCreate,
    /// Reuse the oldest entity of the same kind holding any of the supplied
    /// `(namespace, value)` pairs, adding identifiers it does not yet have.
    #[default]
    ByIdentifier,
}

#[derive(Debug, Clone, Default)]
pub struct ConstructOptions {
    pub reuse: ReusePolicy,
}

impl ConstructOptions {
    pub fn always_create() -> Self {
        Self {
            reuse: ReusePolicy::AlwaysCreate,
        }
    }
}

/// Build and persist a Media, with its director, cast and genres.
pub fn media_from_api(conn: &Connection, api: &ApiMedia, opts: &ConstructOptions) -> Result<Media> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    let m = insert_media(&tx, api, opts)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(media_id = %m.id, title = %m.title, "constructed media");
    Ok(m)
}

/// Build and persist a Person.
pub fn person_from_api(
    conn: &Connection,
    api: &ApiPerson,
    opts: &ConstructOptions,
) -> Result<Person> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    let p = insert_person(&tx, api, opts)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    Ok(p)
}

/// Build and persist a Genre.
pub fn genre_from_api(conn: &Connection, api: &ApiGenre, opts: &ConstructOptions) -> Result<Genre> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    let g = insert_genre(&tx, api, opts)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    Ok(g)
}

// ---------------------------------------------------------------------------
// helpers (run inside the caller's transaction)
// ---------------------------------------------------------------------------

/// Write every supplied id against `owner`. Values are stored as supplied;
/// only the namespace name is checked.
fn write_ids(conn: &Connection, owner: Owner, ids: &[ApiId]) -> Result<()> {
    for id in ids {
        identifiers::set_identifier(conn, owner, id.namespace()?, &id.value)?;
    }
    Ok(())
}

/// First existing owner of `kind` matching any of `ids`, if reuse is enabled.
/// Placeholder ids never match.
fn find_existing(
    conn: &Connection,
    kind: OwnerKind,
    ids: &[ApiId],
    opts: &ConstructOptions,
) -> Result<Option<Owner>> {
    if opts.reuse == ReusePolicy::AlwaysCreate {
        return Ok(None);
    }
    for id in ids.iter().filter(|id| !id.is_placeholder()) {
        let found = identifiers::find_owners(conn, kind, id.namespace()?, &id.value)?;
        if let Some(owner) = found.into_iter().next() {
            return Ok(Some(owner));
        }
    }
    Ok(None)
}

/// Add the ids `owner` does not already hold. Existing values win, and a
/// value already held by another entity of the same kind is left there.
fn merge_ids(conn: &Connection, owner: Owner, ids: &[ApiId]) -> Result<()> {
    let held = identifiers::list_identifiers(conn, owner)?;
    for id in ids {
        let ns = id.namespace()?;
        if held.iter().any(|h| h.namespace == ns) {
            continue;
        }
        let others = identifiers::find_owners(conn, owner.kind(), ns, &id.value)?;
        if let Some(other) = others.iter().find(|o| **o != owner) {
            tracing::warn!(
                %owner,
                %other,
                namespace = %ns,
                value = %id.value,
                "identifier held elsewhere, not merged"
            );
            continue;
        }
        identifiers::set_identifier(conn, owner, ns, &id.value)?;
    }
    Ok(())
}

fn insert_person(conn: &Connection, api: &ApiPerson, opts: &ConstructOptions) -> Result<Person> {
    if let Some(Owner::Person(id)) = find_existing(conn, OwnerKind::Person, &api.ids, opts)? {
        if let Some(existing) = people::get_person(conn, id)? {
            merge_ids(conn, Owner::Person(id), &api.ids)?;
            tracing::debug!(person_id = %id, name = %existing.name, "reused person");
            return Ok(existing);
        }
    }
    let p = people::create_person(conn, &api.name, &api.role)?;
    write_ids(conn, Owner::Person(p.id), &api.ids)?;
    Ok(p)
}

fn insert_genre(conn: &Connection, api: &ApiGenre, opts: &ConstructOptions) -> Result<Genre> {
    if let Some(Owner::Genre(id)) = find_existing(conn, OwnerKind::Genre, &api.ids, opts)? {
        if let Some(existing) = genres::get_genre(conn, id)? {
            merge_ids(conn, Owner::Genre(id), &api.ids)?;
            tracing::debug!(genre_id = %id, name = %existing.name, "reused genre");
            return Ok(existing);
        }
    }
    let g = genres::create_genre(conn, &api.name)?;
    write_ids(conn, Owner::Genre(g.id), &api.ids)?;
    Ok(g)
}

fn insert_media(conn: &Connection, api: &ApiMedia, opts: &ConstructOptions) -> Result<Media> {
    let director = api
        .director
        .first()
        .ok_or_else(|| Error::validation(format!("{} has no director", api.title)))?;

    if let Some(Owner::Media(id)) = find_existing(conn, OwnerKind::Media, &api.ids, opts)? {
        if let Some(existing) = media::get_media(conn, id)? {
            merge_ids(conn, Owner::Media(id), &api.ids)?;
            tracing::debug!(media_id = %id, title = %existing.title, "reused media");
            return Ok(existing);
        }
    }

    let released = api
        .released
        .as_deref()
        .map(rb_core::media::parse_release_date)
        .transpose()?;
    let rating = if api.rating.is_empty() {
        Rating::default()
    } else {
        api.rating.parse()?
    };

    let director = insert_person(conn, director, opts)?;
    let m = media::create_media(
        conn,
        &media::NewMedia {
            title: api.title.clone(),
            description: api.description.clone(),
            released,
            runtime: api.runtime,
            rating,
            director_id: Some(director.id),
            poster_remote_uri: api.poster_url.clone(),
        },
    )?;
    write_ids(conn, Owner::Media(m.id), &api.ids)?;

    for actor in &api.actors {
        let p = insert_person(conn, actor, opts)?;
        media::add_actor(conn, m.id, p.id)?;
    }
    for genre in &api.genres {
        let g = insert_genre(conn, genre, opts)?;
        media::add_genre(conn, m.id, g.id)?;
    }
    Ok(m)
}

//! External identifier store.
//!
//! Each row links one `(namespace, value)` pair to exactly one owner
//! (person, media or genre). An owner holds at most one value per
//! namespace; writing a namespace again replaces the stored value.

use std::fmt;

use chrono::Utc;
use rb_core::{Error, ExternalIdId, Namespace, Owner, OwnerKind, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::ExternalIdentifier;

const COLS: &str = "id, namespace, value, owner_kind, owner_id";

fn owner_table(kind: OwnerKind) -> &'static str {
    match kind {
        OwnerKind::Person => "people",
        OwnerKind::Media => "media",
        OwnerKind::Genre => "genres",
    }
}

/// Fail with `NotFound` unless the owner row exists.
fn ensure_owner_exists(conn: &Connection, owner: Owner) -> Result<()> {
    let q = format!(
        "SELECT COUNT(*) > 0 FROM {} WHERE id = ?1",
        owner_table(owner.kind())
    );
    let exists: bool = conn
        .query_row(&q, [owner.id_string()], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;
    if exists {
        Ok(())
    } else {
        Err(Error::not_found(owner.kind().as_str(), owner.id_string()))
    }
}

/// Link `owner` to `(namespace, value)`. The value is stored in its string form.
pub fn set_identifier(
    conn: &Connection,
    owner: Owner,
    namespace: Namespace,
    value: impl fmt::Display,
) -> Result<ExternalIdentifier> {
    ensure_owner_exists(conn, owner)?;
    let value = value.to_string();

    conn.execute(
        "INSERT INTO external_ids (id, namespace, value, owner_kind, owner_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (owner_kind, owner_id, namespace) DO UPDATE SET value = excluded.value",
        rusqlite::params![
            ExternalIdId::new().to_string(),
            namespace.code(),
            &value,
            owner.kind().as_str(),
            owner.id_string(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let q = format!(
        "SELECT {COLS} FROM external_ids WHERE owner_kind = ?1 AND owner_id = ?2 AND namespace = ?3"
    );
    conn.query_row(
        &q,
        rusqlite::params![owner.kind().as_str(), owner.id_string(), namespace.code()],
        ExternalIdentifier::from_row,
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Value held by `owner` in `namespace`, or `NotFound`.
pub fn get_identifier(conn: &Connection, owner: Owner, namespace: Namespace) -> Result<String> {
    conn.query_row(
        "SELECT value FROM external_ids
         WHERE owner_kind = ?1 AND owner_id = ?2 AND namespace = ?3",
        rusqlite::params![owner.kind().as_str(), owner.id_string(), namespace.code()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))?
    .ok_or_else(|| Error::not_found(format!("{namespace} id"), owner))
}

/// All identifiers held by `owner`, in namespace order.
pub fn list_identifiers(conn: &Connection, owner: Owner) -> Result<Vec<ExternalIdentifier>> {
    let q = format!(
        "SELECT {COLS} FROM external_ids
         WHERE owner_kind = ?1 AND owner_id = ?2 ORDER BY namespace"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params![owner.kind().as_str(), owner.id_string()],
            ExternalIdentifier::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Owners of `kind` holding `(namespace, value)`, oldest first.
pub fn find_owners(
    conn: &Connection,
    kind: OwnerKind,
    namespace: Namespace,
    value: &str,
) -> Result<Vec<Owner>> {
    let mut stmt = conn
        .prepare(
            "SELECT owner_id FROM external_ids
             WHERE owner_kind = ?1 AND namespace = ?2 AND value = ?3
             ORDER BY created_at, rowid",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let ids = stmt
        .query_map(
            rusqlite::params![kind.as_str(), namespace.code(), value],
            |row| row.get::<_, String>(0),
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    ids.iter().map(|id| Owner::from_parts(kind, id)).collect()
}

/// Delete every identifier held by `owner`. Returns the number removed.
pub fn delete_identifiers(conn: &Connection, owner: Owner) -> Result<usize> {
    conn.execute(
        "DELETE FROM external_ids WHERE owner_kind = ?1 AND owner_id = ?2",
        rusqlite::params![owner.kind().as_str(), owner.id_string()],
    )
    .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{genres, people};
    use rb_core::PersonId;

    #[test]
    fn set_then_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Keanu Reeves", "Actor").unwrap();
        let owner = Owner::Person(p.id);

        let row = set_identifier(&conn, owner, Namespace::Tmdb, 6384).unwrap();
        assert_eq!(row.value, "6384");
        assert_eq!(row.owner, owner);
        assert_eq!(get_identifier(&conn, owner, Namespace::Tmdb).unwrap(), "6384");
    }

    #[test]
    fn missing_namespace_is_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let g = genres::create_genre(&conn, "Action").unwrap();

        let err = get_identifier(&conn, Owner::Genre(g.id), Namespace::Imdb).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn rewrite_replaces_value() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Lana Wachowski", "Director").unwrap();
        let owner = Owner::Person(p.id);

        let first = set_identifier(&conn, owner, Namespace::Tvdb, "a").unwrap();
        let second = set_identifier(&conn, owner, Namespace::Tvdb, "b").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(get_identifier(&conn, owner, Namespace::Tvdb).unwrap(), "b");
        assert_eq!(list_identifiers(&conn, owner).unwrap().len(), 1);
    }

    #[test]
    fn unknown_owner_is_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = set_identifier(&conn, Owner::Person(PersonId::new()), Namespace::Tmdb, 1)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn reverse_lookup_is_scoped_by_kind() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Carrie-Anne Moss", "Actor").unwrap();
        let g = genres::create_genre(&conn, "Science Fiction").unwrap();
        set_identifier(&conn, Owner::Person(p.id), Namespace::Tmdb, 530).unwrap();
        set_identifier(&conn, Owner::Genre(g.id), Namespace::Tmdb, 530).unwrap();

        let people_found = find_owners(&conn, OwnerKind::Person, Namespace::Tmdb, "530").unwrap();
        assert_eq!(people_found, vec![Owner::Person(p.id)]);
        let genres_found = find_owners(&conn, OwnerKind::Genre, Namespace::Tmdb, "530").unwrap();
        assert_eq!(genres_found, vec![Owner::Genre(g.id)]);
        assert!(find_owners(&conn, OwnerKind::Media, Namespace::Tmdb, "530")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deleting_owner_cascades() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Hugo Weaving", "Actor").unwrap();
        let owner = Owner::Person(p.id);
        set_identifier(&conn, owner, Namespace::Tmdb, 1331).unwrap();
        set_identifier(&conn, owner, Namespace::Imdb, "nm0915989").unwrap();

        assert!(people::delete_person(&conn, p.id).unwrap());
        assert!(list_identifiers(&conn, owner).unwrap().is_empty());
    }

    #[test]
    fn explicit_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let g = genres::create_genre(&conn, "Drama").unwrap();
        let owner = Owner::Genre(g.id);
        set_identifier(&conn, owner, Namespace::Tmdb, 18).unwrap();
        assert_eq!(delete_identifiers(&conn, owner).unwrap(), 1);
        assert_eq!(delete_identifiers(&conn, owner).unwrap(), 0);
    }
}

//! Person CRUD and identifier lookups.

use chrono::Utc;
use rb_core::{Error, Namespace, Owner, OwnerKind, PersonId, Result};
use rusqlite::Connection;

use crate::models::Person;
use crate::queries::identifiers;

const COLS: &str = "id, name, job, created_at";

/// Create a new person.
pub fn create_person(conn: &Connection, name: &str, job: &str) -> Result<Person> {
    let id = PersonId::new();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO people (id, name, job, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id.to_string(), name, job, created_at],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Person {
        id,
        name: name.to_string(),
        job: job.to_string(),
        created_at,
    })
}

/// Get a person by ID.
pub fn get_person(conn: &Connection, id: PersonId) -> Result<Option<Person>> {
    let q = format!("SELECT {COLS} FROM people WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], Person::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all people ordered by name.
pub fn list_people(conn: &Connection) -> Result<Vec<Person>> {
    let q = format!("SELECT {COLS} FROM people ORDER BY name, created_at");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Person::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// People holding `(namespace, value)`, oldest first.
pub fn find_by_identifier(
    conn: &Connection,
    namespace: Namespace,
    value: &str,
) -> Result<Vec<Person>> {
    let owners = identifiers::find_owners(conn, OwnerKind::Person, namespace, value)?;
    let mut found = Vec::with_capacity(owners.len());
    for owner in owners {
        if let Owner::Person(id) = owner {
            if let Some(p) = get_person(conn, id)? {
                found.push(p);
            }
        }
    }
    Ok(found)
}

/// Delete a person (cascades to identifiers and cast links).
pub fn delete_person(conn: &Connection, id: PersonId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM people WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn crud() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let p = create_person(&conn, "Laurence Fishburne", "Actor").unwrap();
        let found = get_person(&conn, p.id).unwrap().unwrap();
        assert_eq!(found, p);
        assert_eq!(list_people(&conn).unwrap().len(), 1);

        assert!(delete_person(&conn, p.id).unwrap());
        assert!(get_person(&conn, p.id).unwrap().is_none());
        assert!(!delete_person(&conn, p.id).unwrap());
    }

    #[test]
    fn lookup_by_identifier() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = create_person(&conn, "Keanu Reeves", "Actor").unwrap();
        create_person(&conn, "Someone Else", "Actor").unwrap();
        identifiers::set_identifier(&conn, Owner::Person(p.id), Namespace::Tmdb, 6384).unwrap();

        let found = find_by_identifier(&conn, Namespace::Tmdb, "6384").unwrap();
        assert_eq!(found, vec![p]);
        assert!(find_by_identifier(&conn, Namespace::Imdb, "6384").unwrap().is_empty());
    }
}

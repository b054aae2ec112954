//! Typed per-namespace identifier accessors.
//!
//! Any entity that can name itself as an [`Owner`] gets `tmdb_id`,
//! `imdb_id` and `tvdb_id` getters and validated setters on top of the
//! external identifier store.

use rb_core::{IdInput, Namespace, Owner, Result};
use rusqlite::Connection;

use crate::models::{ExternalIdentifier, Genre, Media, Person};
use crate::queries::identifiers;

pub trait HasExternalIdentifiers {
    /// The tagged reference identifiers of this entity are stored under.
    fn owner(&self) -> Owner;

    /// Validate `value` for `namespace` and store it, replacing any value
    /// already held in that namespace.
    fn set_external_id(
        &self,
        conn: &Connection,
        namespace: Namespace,
        value: impl Into<IdInput>,
    ) -> Result<String> {
        let value = namespace.normalize(value.into())?;
        identifiers::set_identifier(conn, self.owner(), namespace, &value)?;
        Ok(value)
    }

    fn external_id(&self, conn: &Connection, namespace: Namespace) -> Result<String> {
        identifiers::get_identifier(conn, self.owner(), namespace)
    }

    /// Integer, or an all-digit string.
    fn set_tmdb_id(&self, conn: &Connection, value: impl Into<IdInput>) -> Result<String> {
        self.set_external_id(conn, Namespace::Tmdb, value)
    }

    /// Two letters followed by seven digits, e.g. `tt0133093`.
    fn set_imdb_id(&self, conn: &Connection, value: impl Into<IdInput>) -> Result<String> {
        self.set_external_id(conn, Namespace::Imdb, value)
    }

    /// Stored as given; tvdb values are not pattern-checked.
    fn set_tvdb_id(&self, conn: &Connection, value: impl Into<IdInput>) -> Result<String> {
        self.set_external_id(conn, Namespace::Tvdb, value)
    }

    fn tmdb_id(&self, conn: &Connection) -> Result<String> {
        self.external_id(conn, Namespace::Tmdb)
    }

    fn imdb_id(&self, conn: &Connection) -> Result<String> {
        self.external_id(conn, Namespace::Imdb)
    }

    fn tvdb_id(&self, conn: &Connection) -> Result<String> {
        self.external_id(conn, Namespace::Tvdb)
    }

    fn external_ids(&self, conn: &Connection) -> Result<Vec<ExternalIdentifier>> {
        identifiers::list_identifiers(conn, self.owner())
    }
}

impl HasExternalIdentifiers for Owner {
    fn owner(&self) -> Owner {
        *self
    }
}

impl HasExternalIdentifiers for Person {
    fn owner(&self) -> Owner {
        Owner::Person(self.id)
    }
}

impl HasExternalIdentifiers for Genre {
    fn owner(&self) -> Owner {
        Owner::Genre(self.id)
    }
}

impl HasExternalIdentifiers for Media {
    fn owner(&self) -> Owner {
        Owner::Media(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{genres, media, people};
    use rb_core::Error;

    #[test]
    fn every_namespace_roundtrips_on_every_owner() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Keanu Reeves", "Actor").unwrap();
        let g = genres::create_genre(&conn, "Action").unwrap();
        let m = media::create_media(
            &conn,
            &media::NewMedia {
                title: "The Matrix".into(),
                ..Default::default()
            },
        )
        .unwrap();

        for owner in [p.owner(), g.owner(), m.owner()] {
            owner.set_tmdb_id(&conn, 603).unwrap();
            owner.set_imdb_id(&conn, "tt0133093").unwrap();
            owner.set_tvdb_id(&conn, "the-matrix").unwrap();

            assert_eq!(owner.tmdb_id(&conn).unwrap(), "603");
            assert_eq!(owner.imdb_id(&conn).unwrap(), "tt0133093");
            assert_eq!(owner.tvdb_id(&conn).unwrap(), "the-matrix");
            assert_eq!(owner.external_ids(&conn).unwrap().len(), 3);
        }
    }

    #[test]
    fn tmdb_accepts_integers_and_digit_strings() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Hugo Weaving", "Actor").unwrap();

        assert_eq!(p.set_tmdb_id(&conn, "1331").unwrap(), "1331");
        assert_eq!(p.set_tmdb_id(&conn, 1331_i64).unwrap(), "1331");
        assert_eq!(p.tmdb_id(&conn).unwrap(), "1331");
    }

    #[test]
    fn tmdb_rejects_non_digits() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Hugo Weaving", "Actor").unwrap();

        for bad in ["abc", "12a", "", "-5", " 42"] {
            assert!(
                matches!(p.set_tmdb_id(&conn, bad), Err(Error::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(p.tmdb_id(&conn).unwrap_err().is_not_found());
    }

    #[test]
    fn imdb_rejects_other_shapes() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let g = genres::create_genre(&conn, "Drama").unwrap();

        for bad in ["tt123", "0133093", "ttt0133093", "tt01330930", "TT0133093"] {
            assert!(
                matches!(g.set_imdb_id(&conn, bad), Err(Error::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            g.set_imdb_id(&conn, 133093),
            Err(Error::Validation(_))
        ));
        assert_eq!(g.set_imdb_id(&conn, "nm0000206").unwrap(), "nm0000206");
    }

    #[test]
    fn tvdb_takes_anything() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let p = people::create_person(&conn, "Carrie-Anne Moss", "Actor").unwrap();

        p.set_tvdb_id(&conn, 81189).unwrap();
        assert_eq!(p.tvdb_id(&conn).unwrap(), "81189");
        p.set_tvdb_id(&conn, "series/breaking-bad").unwrap();
        assert_eq!(p.tvdb_id(&conn).unwrap(), "series/breaking-bad");
    }

    #[test]
    fn identifiers_vanish_with_owner() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let g = genres::create_genre(&conn, "Thriller").unwrap();
        g.set_tmdb_id(&conn, 53).unwrap();

        genres::delete_genre(&conn, g.id).unwrap();
        assert!(g.external_ids(&conn).unwrap().is_empty());
        assert!(g.tmdb_id(&conn).unwrap_err().is_not_found());
    }
}

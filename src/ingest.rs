//! Ingestion: look things up with a [`MetadataSource`] and persist them.

use rb_core::{Error, Result};
use rb_db::construct::{self, ConstructOptions};
use rb_db::models::{Genre, Media};
use rb_db::pool::{get_conn, DbPool};

use crate::provider::{LookupTerm, MetadataSource};

pub struct Ingestor<S> {
    source: S,
    pool: DbPool,
    options: ConstructOptions,
}

impl<S: MetadataSource> Ingestor<S> {
    pub fn new(source: S, pool: DbPool, options: ConstructOptions) -> Self {
        Self {
            source,
            pool,
            options,
        }
    }

    /// Look up `term` and store one Media per result.
    ///
    /// Results without a director are skipped with a warning; any other
    /// failure aborts the remaining results.
    pub async fn ingest_movie(&self, term: &LookupTerm) -> Result<Vec<Media>> {
        let found = self.source.lookup(term).await?;
        tracing::info!(source = self.source.name(), count = found.len(), ?term, "lookup complete");

        let mut stored = Vec::with_capacity(found.len());
        for api in found {
            let pool = self.pool.clone();
            let options = self.options.clone();
            let title = api.title.clone();
            let result = tokio::task::spawn_blocking(move || {
                let conn = get_conn(&pool)?;
                construct::media_from_api(&conn, &api, &options)
            })
            .await
            .map_err(|e| Error::Internal(format!("ingest task failed: {e}")))?;

            match result {
                Ok(media) => {
                    tracing::info!(media_id = %media.id, title = %media.title, "stored media");
                    stored.push(media);
                }
                Err(Error::Validation(reason)) => {
                    tracing::warn!(%title, %reason, "skipping media");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(stored)
    }

    /// Fetch the genre list and store one Genre per entry.
    pub async fn ingest_genres(&self) -> Result<Vec<Genre>> {
        let found = self.source.genres().await?;
        let pool = self.pool.clone();
        let options = self.options.clone();

        let stored = tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            found
                .iter()
                .map(|api| construct::genre_from_api(&conn, api, &options))
                .collect::<Result<Vec<_>>>()
        })
        .await
        .map_err(|e| Error::Internal(format!("ingest task failed: {e}")))??;

        tracing::info!(source = self.source.name(), count = stored.len(), "stored genres");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rb_core::{ApiGenre, ApiId, ApiMedia, ApiPerson};
    use rb_db::pool::init_memory_pool;
    use rb_db::queries::{genres, media};

    struct FixedSource {
        media: Vec<ApiMedia>,
        genres: Vec<ApiGenre>,
    }

    #[async_trait]
    impl MetadataSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn lookup(&self, _term: &LookupTerm) -> Result<Vec<ApiMedia>> {
            Ok(self.media.clone())
        }

        async fn genres(&self) -> Result<Vec<ApiGenre>> {
            Ok(self.genres.clone())
        }
    }

    fn movie(title: &str, tmdb: i64, with_director: bool) -> ApiMedia {
        ApiMedia {
            title: title.into(),
            rating: "PG".into(),
            director: if with_director {
                vec![ApiPerson {
                    name: "Ridley Scott".into(),
                    role: "Director".into(),
                    ids: vec![ApiId::tmdb(578)],
                }]
            } else {
                Vec::new()
            },
            ids: vec![ApiId::tmdb(tmdb)],
            ..Default::default()
        }
    }

    fn genre(name: &str, tmdb: i64) -> ApiGenre {
        ApiGenre {
            name: name.into(),
            ids: vec![ApiId::tmdb(tmdb)],
        }
    }

    #[tokio::test]
    async fn stores_media_and_skips_directorless() {
        let pool = init_memory_pool().unwrap();
        let source = FixedSource {
            media: vec![movie("Alien", 348, true), movie("Unknown", 1, false)],
            genres: Vec::new(),
        };
        let ingestor = Ingestor::new(source, pool.clone(), ConstructOptions::default());

        let stored = ingestor.ingest_movie(&LookupTerm::from("alien")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Alien");

        let conn = pool.get().unwrap();
        assert_eq!(media::list_media(&conn).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn genres_are_deduplicated_on_reingest() {
        let pool = init_memory_pool().unwrap();
        let source = FixedSource {
            media: Vec::new(),
            genres: vec![genre("Action", 28), genre("Drama", 18)],
        };
        let ingestor = Ingestor::new(source, pool.clone(), ConstructOptions::default());

        ingestor.ingest_genres().await.unwrap();
        let again = ingestor.ingest_genres().await.unwrap();
        assert_eq!(again.len(), 2);

        let conn = pool.get().unwrap();
        assert_eq!(genres::list_genres(&conn).unwrap().len(), 2);
    }
}

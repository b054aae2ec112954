use rb_db::construct::{ConstructOptions, ReusePolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file. Relative paths resolve against the working directory.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("reelbase.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version segment of the request path.
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub api_key: String,
}

fn default_base_url() -> String {
    "http://api.themoviedb.org".to_string()
}

fn default_version() -> String {
    "2.1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            language: default_language(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Reuse stored people, genres and media whose identifiers match
    /// instead of inserting duplicates.
    #[serde(default = "default_reuse_existing")]
    pub reuse_existing: bool,
}

fn default_reuse_existing() -> bool {
    true
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            reuse_existing: default_reuse_existing(),
        }
    }
}

impl IngestConfig {
    pub fn construct_options(&self) -> ConstructOptions {
        ConstructOptions {
            reuse: if self.reuse_existing {
                ReusePolicy::ByIdentifier
            } else {
                ReusePolicy::AlwaysCreate
            },
        }
    }
}

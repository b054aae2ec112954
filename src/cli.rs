use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelbase")]
#[command(author, version, about = "Movie metadata ingestion client")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a title or IMDB id and print the result as JSON
    Lookup {
        /// Title or IMDB id (tt0133093). Digits are searched as a title
        #[arg(required_unless_present = "tmdb_id")]
        term: Option<String>,

        /// Fetch a movie by its numeric TMDB id instead
        #[arg(long, conflicts_with = "term")]
        tmdb_id: Option<i64>,
    },

    /// Look up a title or IMDB id and store the results
    Ingest {
        /// Title or IMDB id (tt0133093). Digits are searched as a title
        #[arg(required_unless_present = "tmdb_id")]
        term: Option<String>,

        /// Fetch a movie by its numeric TMDB id instead
        #[arg(long, conflicts_with = "term")]
        tmdb_id: Option<i64>,
    },

    /// Fetch and store the provider's genre list
    Genres,

    /// Find stored entities by external identifier
    Ids {
        /// Entity kind: person, media or genre
        kind: String,

        /// Identifier namespace: tmdb, imdb or tvdb
        namespace: String,

        /// Identifier value
        value: String,
    },

    /// Read or write persisted settings
    Setting {
        #[command(subcommand)]
        action: SettingAction,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum SettingAction {
    /// Print a setting's value
    Get { key: String },

    /// Store a setting
    Set { key: String, value: String },

    /// Print all settings
    List,
}

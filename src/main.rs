mod cli;

use reelbase::config::{self, Config};
use reelbase::ingest::Ingestor;
use reelbase::provider::{LookupTerm, MetadataSource, TmdbClient};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SettingAction};
use rb_core::{Namespace, Owner, OwnerKind};
use rb_db::pool::{get_conn, init_pool, DbPool};
use rb_db::queries::{genres, identifiers, media, people, settings};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelbase=debug,rb_db=debug,rb_core=debug".to_string()
        } else {
            "reelbase=info,rb_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lookup { term, tmdb_id } => {
            let term = cli_term(term.as_deref(), tmdb_id)?;
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(lookup(&config, &term))
        }
        Commands::Ingest { term, tmdb_id } => {
            let term = cli_term(term.as_deref(), tmdb_id)?;
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ingest(&config, &term))
        }
        Commands::Genres => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ingest_genres(&config))
        }
        Commands::Ids {
            kind,
            namespace,
            value,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            find_ids(&config, &kind, &namespace, &value)
        }
        Commands::Setting { action } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            setting(&config, action)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelbase {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_db(config: &Config) -> Result<DbPool> {
    let db_path = config.database.path.to_string_lossy();
    tracing::debug!("Opening database at {}", db_path);
    init_pool(&db_path).with_context(|| format!("Failed to open database: {}", db_path))
}

fn cli_term(text: Option<&str>, tmdb_id: Option<i64>) -> Result<LookupTerm> {
    LookupTerm::from_cli(text, tmdb_id).context("a search term or --tmdb-id is required")
}

async fn lookup(config: &Config, term: &LookupTerm) -> Result<()> {
    let client = TmdbClient::new(&config.tmdb);
    let found = client.lookup(term).await?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

async fn ingest(config: &Config, term: &LookupTerm) -> Result<()> {
    let pool = open_db(config)?;
    let ingestor = Ingestor::new(
        TmdbClient::new(&config.tmdb),
        pool,
        config.ingest.construct_options(),
    );

    let stored = ingestor.ingest_movie(term).await?;
    for m in &stored {
        println!("{}\t{}", m.id, m.title);
    }
    println!("Stored {} media", stored.len());
    Ok(())
}

async fn ingest_genres(config: &Config) -> Result<()> {
    let pool = open_db(config)?;
    let ingestor = Ingestor::new(
        TmdbClient::new(&config.tmdb),
        pool,
        config.ingest.construct_options(),
    );

    let stored = ingestor.ingest_genres().await?;
    for g in &stored {
        println!("{}\t{}", g.id, g.name);
    }
    println!("Stored {} genres", stored.len());
    Ok(())
}

fn find_ids(config: &Config, kind: &str, namespace: &str, value: &str) -> Result<()> {
    let kind: OwnerKind = kind.parse()?;
    let namespace: Namespace = namespace.parse()?;

    let pool = open_db(config)?;
    let conn = get_conn(&pool)?;
    let owners = identifiers::find_owners(&conn, kind, namespace, value)?;

    if owners.is_empty() {
        println!("No {} found with {} id {}", kind, namespace, value);
        return Ok(());
    }

    for owner in owners {
        let label = match owner {
            Owner::Person(id) => people::get_person(&conn, id)?.map(|p| p.name),
            Owner::Media(id) => media::get_media(&conn, id)?.map(|m| m.title),
            Owner::Genre(id) => genres::get_genre(&conn, id)?.map(|g| g.name),
        };
        println!("{}\t{}", owner, label.unwrap_or_default());
    }
    Ok(())
}

fn setting(config: &Config, action: SettingAction) -> Result<()> {
    let pool = open_db(config)?;
    let conn = get_conn(&pool)?;

    match action {
        SettingAction::Get { key } => match settings::get_setting(&conn, &key)? {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Setting not found: {}", key),
        },
        SettingAction::Set { key, value } => {
            settings::set_setting(&conn, &key, &value)?;
            println!("{} = {}", key, value);
        }
        SettingAction::List => {
            for s in settings::list_settings(&conn)? {
                println!("{} = {}", s.key, s.value);
            }
        }
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Database: {}", config.database.path.display());
            println!("  TMDB: {} (v{})", config.tmdb.base_url, config.tmdb.version);
            println!("  Language: {}", config.tmdb.language);
            println!("  API key set: {}", !config.tmdb.api_key.is_empty());
            println!("  Reuse existing: {}", config.ingest.reuse_existing);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            config::validate_config(&config)?;
            println!("Default config:");
            println!("  Database: {}", config.database.path.display());
            println!("  TMDB: {} (v{})", config.tmdb.base_url, config.tmdb.version);
        }
    }

    Ok(())
}

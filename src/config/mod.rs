mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./reelbase.toml", "~/.config/reelbase/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    tracing::warn!("No config file found, using defaults");
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tmdb.base_url.trim().is_empty() {
        anyhow::bail!("TMDB base_url cannot be empty");
    }

    if config.tmdb.version.trim().is_empty() {
        anyhow::bail!("TMDB version cannot be empty");
    }

    if config.tmdb.api_key.is_empty() {
        tracing::warn!("TMDB api_key is empty; lookups will be rejected by the API");
    }

    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_db::ReusePolicy;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tmdb.base_url, "http://api.themoviedb.org");
        assert_eq!(config.tmdb.version, "2.1");
        assert_eq!(config.tmdb.language, "en");
        assert!(config.ingest.reuse_existing);
        assert_eq!(
            config.ingest.construct_options().reuse,
            ReusePolicy::ByIdentifier
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[tmdb]
api_key = "abc123"

[ingest]
reuse_existing = false
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tmdb.api_key, "abc123");
        assert_eq!(config.tmdb.version, "2.1");
        assert_eq!(config.database.path, Path::new("reelbase.db"));
        assert_eq!(
            config.ingest.construct_options().reuse,
            ReusePolicy::AlwaysCreate
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let file = write_config("[tmdb]\nbase_url = \"\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn malformed_toml_reports_path() {
        let file = write_config("[tmdb\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_or_default(Some(Path::new("/nonexistent/reelbase.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

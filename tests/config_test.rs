//! Default config discovery tests.
//!
//! These change the working directory, so they run serially.

use reelbase::config::load_config_or_default;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

struct CwdGuard(std::path::PathBuf);

impl CwdGuard {
    fn enter(dir: &std::path::Path) -> Self {
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self(prev)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn picks_up_reelbase_toml_in_working_directory() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("reelbase.toml"),
        "[tmdb]\nlanguage = \"de\"\n",
    )
    .unwrap();

    let _cwd = CwdGuard::enter(dir.path());
    let config = load_config_or_default(None).unwrap();
    assert_eq!(config.tmdb.language, "de");
}

#[test]
#[serial]
fn invalid_default_file_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("reelbase.toml"), "[tmdb]\nbase_url = \"\"\n").unwrap();

    let _cwd = CwdGuard::enter(dir.path());
    assert!(load_config_or_default(None).is_err());
}

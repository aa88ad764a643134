//! Configuration loading for skiff.
//!
//! Three layers, later ones winning: built-in platform defaults, an
//! optional TOML file in the user's config directory, and `SKIFF_*`
//! environment variables (double underscore separating sections, e.g.
//! `SKIFF_CACHE__PATH`).

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SKIFF_";
const CONFIG_FILE: &str = "config.toml";

/// Everything the toolkit needs to know at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
    pub extract: ExtractConfig,
}

/// Remote API credentials and listing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// OAuth client secrets, as downloaded from the API console.
    pub credentials_path: PathBuf,
    /// Where the obtained credential is persisted between sessions.
    pub token_path: PathBuf,
    /// Listing page size; the API default is used when absent.
    pub page_size: Option<u32>,
}

/// Local document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
}

/// Index extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// The literal, case-sensitive index prefix token.
    pub prefix: String,
}

/// Platform-appropriate directories, falling back to the working
/// directory when the platform reports no home.
fn project_dirs() -> (PathBuf, PathBuf) {
    match directories::ProjectDirs::from("", "", "skiff") {
        Some(dirs) => (dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf()),
        None => (PathBuf::from("."), PathBuf::from(".")),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            cache: CacheConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let (config_dir, _) = project_dirs();
        Self {
            credentials_path: config_dir.join("credentials.json"),
            token_path: config_dir.join("token.json"),
            page_size: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let (_, data_dir) = project_dirs();
        Self { path: data_dir.join("documents.db") }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { prefix: "CKS".to_string() }
    }
}

impl Config {
    /// Load configuration from the default file location, the environment,
    /// and built-in defaults.
    pub fn load() -> Result<Self> {
        let (config_dir, _) = project_dirs();
        Self::load_from(config_dir.join(CONFIG_FILE))
    }

    /// Load configuration with an explicit file path (which may not exist;
    /// missing files simply contribute nothing).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading configuration");
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| {
                tracing::warn!(error = %e, "configuration rejected");
                exn::Exn::from(ErrorKind::Invalid)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();
        assert!(config.cache.path.ends_with("documents.db"));
        assert!(config.remote.token_path.ends_with("token.json"));
        assert_eq!(config.extract.prefix, "CKS");
        assert_eq!(config.remote.page_size, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
                [extract]
                prefix = "INV"

                [remote]
                page_size = 250
            "#
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.extract.prefix, "INV");
        assert_eq!(config.remote.page_size, Some(250));
        // Untouched sections keep their defaults.
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn environment_wins_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[cache]\npath = \"from-file.db\"")?;
            jail.set_env("SKIFF_CACHE__PATH", "from-env.db");
            let config = Config::load_from("config.toml").expect("config should load");
            assert_eq!(config.cache.path, PathBuf::from("from-env.db"));
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "extract = \"not a table\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid));
    }
}

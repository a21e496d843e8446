//! Configuration file handling for the mototaxi ledger.
//!
//! The configuration file is stored at `$MOTOTAXI_HOME/config.json` and holds the business
//! timezone. The ledger database lives next to it at `$MOTOTAXI_HOME/mototaxi.sqlite`.

use crate::clock::BusinessClock;
use crate::db::Db;
use crate::ledger::Ledger;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_NAME: &str = "mototaxi";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_TIMEZONE: &str = "America/Caracas";
const CONFIG_JSON: &str = "config.json";
const MOTOTAXI_SQLITE: &str = "mototaxi.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$MOTOTAXI_HOME` and from there it loads `$MOTOTAXI_HOME/config.json` and opens
/// the database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    clock: BusinessClock,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory, an empty database and an initial `config.json`. The config
    /// file is written last, so a failed `create` can be retried.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/mototaxi`
    /// - `timezone` - The IANA name of the business timezone. Defaults to `America/Caracas`.
    ///
    /// # Errors
    /// - Returns an error if the timezone is unknown, the database already exists, or any file
    ///   operation fails.
    pub async fn create(dir: impl Into<PathBuf>, timezone: Option<&str>) -> Result<Self> {
        let config_file = ConfigFile {
            timezone: timezone.unwrap_or(DEFAULT_TIMEZONE).to_string(),
            ..ConfigFile::default()
        };
        let clock = BusinessClock::from_name(&config_file.timezone)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the mototaxi home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let sqlite_path = root.join(MOTOTAXI_SQLITE);
        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;

        if let Err(e) = config_file.save(&config_path).await {
            db.close().await;
            if let Err(remove_error) = utils::remove_file(&sqlite_path).await {
                warn!("{remove_error:#}");
            }
            return Err(e);
        }

        Ok(Self {
            root,
            config_path,
            config_file,
            clock,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `mototaxi_home` exists and that the config file exists
    /// - load the config file
    /// - open the database, migrating it if needed
    pub async fn load(mototaxi_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = mototaxi_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Mototaxi Home is missing, run 'mototaxi init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let clock = BusinessClock::from_name(&config_file.timezone)?;

        let sqlite_path = root.join(MOTOTAXI_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            clock,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn timezone(&self) -> &str {
        &self.config_file.timezone
    }

    pub fn clock(&self) -> BusinessClock {
        self.clock
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    /// A ledger over this home's database.
    pub fn ledger(&self) -> Ledger<Db> {
        Ledger::new(self.db().clone())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "mototaxi",
///   "config_version": 1,
///   "timezone": "America/Caracas"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "mototaxi"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// IANA name of the timezone the business day is counted in
    #[serde(default = "default_timezone")]
    timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            timezone: default_timezone(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app or
    /// a newer config version.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {} in config file, the newest known is {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("mototaxi_home");

        let created = Config::create(&home, None).await.unwrap();
        assert_eq!(created.timezone(), "America/Caracas");
        assert!(created.config_path().is_file());
        assert!(created.sqlite_path().is_file());

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.config_file, created.config_file);
        assert_eq!(loaded.clock(), created.clock());
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), Some("America/Bogota"))
            .await
            .unwrap();
        assert!(Config::create(dir.path(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_config_create_unknown_timezone() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        assert!(Config::create(&home, Some("Nowhere/Special")).await.is_err());
        assert!(!home.join(CONFIG_JSON).exists());
    }

    #[tokio::test]
    async fn test_config_create_after_failed_db_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let blocker = home.join(MOTOTAXI_SQLITE);
        utils::make_dir(&blocker).await.unwrap();

        assert!(Config::create(&home, None).await.is_err());
        assert!(!home.join(CONFIG_JSON).exists());

        tokio::fs::remove_dir(&blocker).await.unwrap();
        let config = Config::create(&home, None).await.unwrap();
        assert!(config.sqlite_path().is_file());
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_minimal_uses_default_timezone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{"app_name": "mototaxi", "config_version": 1}"#)
            .await
            .unwrap();
        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{"app_name": "ledger", "config_version": 1}"#)
            .await
            .unwrap();
        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_newer_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{"app_name": "mototaxi", "config_version": 9}"#)
            .await
            .unwrap();
        assert!(ConfigFile::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let original = ConfigFile {
            timezone: "America/Lima".to_string(),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        assert_eq!(ConfigFile::load(&path).await.unwrap(), original);
    }
}

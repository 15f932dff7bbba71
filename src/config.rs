//! Configuration file handling for dompet.
//!
//! The configuration file is stored at `$DOMPET_HOME/config.json`. It selects the store backend
//! and holds the rules the engine runs with: alert thresholds, an optional replacement for the
//! built-in keyword lexicon, and optional replacements for the targets a new budget is seeded
//! with.

use crate::backup::Backup;
use crate::db::Db;
use crate::engine::{Budget, Classifier};
use crate::model::{AlertThresholds, Lexicon, TargetSeed};
use crate::store::{JsonStore, Store, StoreBackend};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const APP_NAME: &str = "dompet";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$DOMPET_HOME` and from there it loads `$DOMPET_HOME/config.json` and opens the
/// configured store.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    store_path: PathBuf,
    store: Arc<dyn Store>,
}

impl Config {
    /// Creates the home directory, its backups directory, an initial `config.json` and an empty
    /// store of the chosen `backend`.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a `config.json`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, backend: StoreBackend) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the dompet home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A dompet home already exists at '{}'", root.display());
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile {
            store: backend,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let store_path = root.join(backend.file_name());
        let store: Arc<dyn Store> = match backend {
            StoreBackend::Sqlite => Arc::new(
                Db::init(&store_path)
                    .await
                    .context("Unable to create SQLite DB")?,
            ),
            StoreBackend::Json => Arc::new(JsonStore::new(&store_path)),
        };
        debug!("Created dompet home at {}", root.display());

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store_path,
            store,
        })
    }

    /// This will
    /// - validate that `dompet_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - open the configured store
    pub async fn load(dompet_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dompet_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Dompet home is missing, run 'dompet init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let backups = root.join(BACKUPS);
        if !backups.is_dir() {
            bail!("The backups directory is missing '{}'", backups.display())
        }

        let store_path = root.join(config_file.store.file_name());
        let store: Arc<dyn Store> = match config_file.store {
            StoreBackend::Sqlite => Arc::new(
                Db::load(&store_path)
                    .await
                    .context("Unable to load SQLite DB")?,
            ),
            StoreBackend::Json => Arc::new(JsonStore::new(&store_path)),
        };

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store_path,
            store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.config_file.store
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// A classifier using the configured lexicon, or the built-in one.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.config_file.lexicon.clone().unwrap_or_default())
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.config_file.alerts
    }

    /// The targets a budget starts with when nothing has been saved yet.
    pub fn default_targets(&self) -> Vec<TargetSeed> {
        self.config_file
            .default_targets
            .clone()
            .unwrap_or_else(TargetSeed::defaults)
    }

    /// Loads the budget from the store, seeding the default targets if nothing was saved before.
    pub async fn open_budget(&self) -> Result<Budget> {
        let budget = match self.store.load().await? {
            Some(data) => Budget::new(data, self.classifier(), self.thresholds()),
            None => {
                debug!("Nothing saved yet, seeding the default targets");
                Budget::seeded(self.default_targets(), self.classifier(), self.thresholds())
            }
        };
        Ok(budget)
    }

    pub async fn save_budget(&self, budget: &Budget) -> Result<()> {
        self.store.save(&budget.data()).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "dompet",
///   "config_version": 1,
///   "backup_copies": 5,
///   "store": "sqlite",
///   "alerts": { "warning_percent": 80, "danger_percent": 100 },
///   "lexicon": [
///     { "category": "Makanan", "keywords": ["makan", "kopi"] },
///     { "category": "Transport", "keywords": ["bensin", "grab"] }
///   ],
///   "default_targets": [
///     { "name": "Tabungan", "target": 1000000, "keywords": ["tabungan", "nabung"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "dompet"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    #[serde(default)]
    store: StoreBackend,

    #[serde(default)]
    alerts: AlertThresholds,

    /// Replaces the built-in lexicon when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lexicon: Option<Lexicon>,

    /// Replaces the seeded targets when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_targets: Option<Vec<TargetSeed>>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            store: StoreBackend::default(),
            alerts: AlertThresholds::default(),
            lexicon: None,
            default_targets: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or holds invalid settings
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        ensure!(config.backup_copies > 0, "backup_copies must be at least 1");
        ensure!(
            config.alerts.warning_percent > rust_decimal::Decimal::ZERO
                && config.alerts.warning_percent <= config.alerts.danger_percent,
            "Invalid alerts in config file: warning_percent ({}) must be positive and no greater \
             than danger_percent ({})",
            config.alerts.warning_percent,
            config.alerts.danger_percent
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

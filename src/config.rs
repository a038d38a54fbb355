//! Configuration file handling for finboard.
//!
//! The configuration file is stored at `$FINBOARD_HOME/config.json` and contains the backend URL,
//! its public key, and optionally a custom location for the session file.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "finboard";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CONFIG_JSON: &str = "config.json";
const SESSION_JSON: &str = "session.json";
const TEST_BACKEND_JSON: &str = "test_backend.json";

/// The configuration of the app. You instantiate it by providing the path to `$FINBOARD_HOME`
/// and from there it loads `$FINBOARD_HOME/config.json`. It also provides paths to the files that
/// live in the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    backend_url: Url,
}

impl Config {
    /// Creates the home directory with its `.secrets` subdirectory and writes an initial
    /// `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/finboard`
    /// - `backend_url` - The base URL of the hosted backend, e.g. `https://abc.supabase.co`
    /// - `anon_key` - The public key sent with every request in the `apikey` header
    pub async fn create(dir: impl Into<PathBuf>, backend_url: &str, anon_key: &str) -> Result<Self> {
        let backend_url = parse_backend_url(backend_url)?;
        if anon_key.trim().is_empty() {
            bail!("The anon key must not be empty");
        }

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the finboard home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend_url: backend_url.to_string(),
            anon_key: anon_key.trim().to_string(),
            session_path: None,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            backend_url,
        })
    }

    /// Validates that the home directory and `config.json` exist, loads the config file, and
    /// checks that the secrets directory is present.
    pub async fn load(finboard_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = finboard_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The finboard home directory is missing, run 'finboard init' first")?;
        let _ = utils::read_dir(&root)
            .await
            .context("The finboard home directory is unreadable")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let backend_url = parse_backend_url(&config_file.backend_url)?;

        let secrets = root.join(SECRETS);
        if !secrets.is_dir() {
            bail!("The secrets directory is missing '{}'", secrets.display())
        }

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            backend_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    /// The backend base URL, always ending in `/`.
    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    pub fn anon_key(&self) -> &str {
        &self.config_file.anon_key
    }

    /// The stored `session_path` resolved against the home directory, or
    /// `$FINBOARD_HOME/.secrets/session.json` when none is configured.
    pub fn session_path(&self) -> PathBuf {
        match &self.config_file.session_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => self.secrets.join(SESSION_JSON),
        }
    }

    /// Where the offline backend keeps its data.
    pub fn test_backend_path(&self) -> PathBuf {
        self.root.join(TEST_BACKEND_JSON)
    }
}

/// Parses the backend URL and gives it a trailing slash so that relative paths join beneath it.
fn parse_backend_url(s: &str) -> Result<Url> {
    let trimmed = s.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).with_context(|| format!("Invalid backend URL '{s}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("The backend URL must use http or https, got '{other}'"),
    }
}

/// The serialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "finboard",
///   "config_version": 1,
///   "backend_url": "https://abcdefgh.supabase.co/",
///   "anon_key": "eyJhbGciOi...",
///   "session_path": ".secrets/session.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Should always be "finboard"
    app_name: String,

    config_version: u8,

    backend_url: String,

    /// Public key of the backend project
    anon_key: String,

    /// Relative to the home directory or absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_path: Option<PathBuf>,
}

impl ConfigFile {
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file",
            config.config_version
        );
        Ok(config)
    }

    async fn save(&self, path: &Path) -> Result<()> {
        utils::serialize(path, self, false)
            .await
            .context("Unable to write config file")
    }
}

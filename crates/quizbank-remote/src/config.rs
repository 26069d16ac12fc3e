//! Configuration loading and the source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbank_core::session::DEFAULT_QUESTION_COUNT;
use quizbank_core::traits::BankSource;

use crate::http::{HttpBankSource, DEFAULT_TIMEOUT_SECS};

/// The canonical bank published upstream.
pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/SailboatSteve/SMQT_Practice_Exam/main/test_questions.json";

/// Name of the bank file inside the data directory.
pub const BANK_FILE_NAME: &str = "test_questions.json";

/// Top-level quizbank configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizbankConfig {
    /// Where the bank, backups and session live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// URL of the canonical bank.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    #[serde(default = "default_timeout")]
    pub fetch_timeout_secs: u64,
    /// Test length used when none is given.
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    /// Bank copied into an empty data directory on first run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_bank: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("APPDATA")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizbank")
}
fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

impl Default for QuizbankConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            remote_url: default_remote_url(),
            fetch_timeout_secs: default_timeout(),
            default_question_count: default_question_count(),
            seed_bank: None,
        }
    }
}

impl QuizbankConfig {
    pub fn bank_path(&self) -> PathBuf {
        self.data_dir.join(BANK_FILE_NAME)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    /// Where the CLI persists the in-progress attempt between invocations.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Render as TOML, for `quizbank init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables resolve to the empty string.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from the default locations.
///
/// Search order:
/// 1. `quizbank.toml` in the current directory
/// 2. `~/.config/quizbank/config.toml`
///
/// Environment variable overrides: `QUIZBANK_DATA_DIR`, `QUIZBANK_REMOTE_URL`.
pub fn load_config() -> Result<QuizbankConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbankConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizbank.toml");
            if local.exists() {
                Some(local)
            } else {
                global_config_path().filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizbankConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbankConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZBANK_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(url) = std::env::var("QUIZBANK_REMOTE_URL") {
        config.remote_url = url;
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.remote_url = resolve_env_vars(&config.remote_url);
    config.seed_bank = config.seed_bank.as_deref().map(resolve_path);

    Ok(config)
}

/// `~/.config/quizbank/config.toml`, if `HOME` is set.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("quizbank")
            .join("config.toml")
    })
}

/// Create the bank source the configuration points at.
pub fn create_source(config: &QuizbankConfig) -> Result<Arc<dyn BankSource>> {
    if config.remote_url.is_empty() {
        anyhow::bail!("no remote_url configured");
    }
    let source = HttpBankSource::new(&config.remote_url, config.fetch_timeout_secs)
        .context("failed to create HTTP source")?;
    Ok(Arc::new(source))
}

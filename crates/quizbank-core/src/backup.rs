//! Timestamped snapshots of the bank file.
//!
//! Backups are raw byte copies named `questions_<YYYYMMDD_HHMM>.json`.
//! Names sort chronologically, so retention keeps the largest names.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{BackupError, StoreError};
use crate::parser::parse_bank_array;
use crate::store::QuestionStore;
use crate::time::Clock;

/// Number of backups kept on disk.
pub const BACKUP_RETENTION: usize = 3;

const PREFIX: &str = "questions_";
const SUFFIX: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const DISPLAY_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// A backup on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub path: PathBuf,
    /// `YYYYMMDD_HHMM`; doubles as the backup id.
    pub timestamp: String,
    /// Human-readable creation time, e.g. `March 01, 2024 09:30 AM`.
    pub display_date: String,
}

/// Creates, lists and restores bank backups.
pub struct BackupManager {
    store: Arc<QuestionStore>,
    dir: PathBuf,
    clock: Clock,
}

impl BackupManager {
    pub fn new(store: Arc<QuestionStore>, dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            dir: dir.into(),
            clock: Clock::System,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot the live bank and prune all but the newest backups.
    pub fn create_backup(&self) -> Result<PathBuf, BackupError> {
        let content = self.store.read_raw().map_err(|e| match e {
            StoreError::NotFound { path } => BackupError::BankUnreadable {
                path,
                source: std::io::ErrorKind::NotFound.into(),
            },
            StoreError::Io { path, source } => BackupError::BankUnreadable { path, source },
            other => BackupError::Store(other),
        })?;

        std::fs::create_dir_all(&self.dir).map_err(|source| BackupError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let path = self.dir.join(format!("{PREFIX}{timestamp}{SUFFIX}"));
        std::fs::write(&path, &content).map_err(|source| BackupError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!("created backup {}", path.display());

        for old in self.backup_files()?.into_iter().skip(BACKUP_RETENTION) {
            tracing::debug!("removing old backup {}", old.display());
            if let Err(e) = std::fs::remove_file(&old) {
                tracing::warn!("could not remove old backup {}: {e}", old.display());
            }
        }

        Ok(path)
    }

    /// The newest backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, BackupError> {
        Ok(self
            .backup_files()?
            .into_iter()
            .filter_map(|path| describe(&path).map(|(timestamp, display_date)| BackupInfo {
                path,
                timestamp,
                display_date,
            }))
            .take(BACKUP_RETENTION)
            .collect())
    }

    /// Map a backup id (`YYYYMMDD_HHMM`) to its file.
    pub fn resolve(&self, id: &str) -> Result<PathBuf, BackupError> {
        if NaiveDateTime::parse_from_str(id, TIMESTAMP_FORMAT).is_err() {
            return Err(BackupError::BackupNotFound(id.to_string()));
        }
        let path = self.dir.join(format!("{PREFIX}{id}{SUFFIX}"));
        if path.is_file() {
            Ok(path)
        } else {
            Err(BackupError::BackupNotFound(id.to_string()))
        }
    }

    /// Replace the live bank with the content of `path`.
    ///
    /// The backup must be a JSON array of questions. The current bank is
    /// backed up first so a bad restore can itself be undone; the path of
    /// that safety backup is returned.
    ///
    /// Backup names have minute resolution, so restoring a backup taken in
    /// the current minute replaces that file with the pre-restore bank.
    pub fn restore(&self, path: &Path) -> Result<PathBuf, BackupError> {
        let content = std::fs::read(path)
            .map_err(|_| BackupError::BackupNotFound(path.display().to_string()))?;
        let questions = parse_bank_array(&content).map_err(BackupError::InvalidBackupFormat)?;

        let safety = self.create_backup()?;
        if safety == path {
            tracing::warn!(
                "safety backup {} replaced the backup being restored (same minute); \
                 its previous content now lives only in the live bank",
                safety.display()
            );
        } else {
            tracing::info!("backed up current bank to {} before restore", safety.display());
        }

        self.store.write_raw(&content)?;
        tracing::info!(
            "restored {} questions from {}",
            questions.len(),
            path.display()
        );
        Ok(safety)
    }

    /// Backup files, newest name first.
    fn backup_files(&self) -> Result<Vec<PathBuf>, BackupError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(BackupError::Write {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(PREFIX) && n.ends_with(SUFFIX))
            })
            .collect();
        files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(files)
    }
}

/// Timestamp and display date for a backup path, if its name parses.
fn describe(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let timestamp = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    let date = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some((timestamp.to_string(), date.format(DISPLAY_FORMAT).to_string()))
}

//! Subcommand implementations and the state they share.

pub mod backup;
pub mod edit;
pub mod exam;
pub mod init;
pub mod update;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use quizbank_core::admin::AdminService;
use quizbank_core::backup::BackupManager;
use quizbank_core::exam::ExamService;
use quizbank_core::session::Session;
use quizbank_core::store::QuestionStore;
use quizbank_core::sync::RemoteSync;
use quizbank_remote::config::{create_source, load_config_from, QuizbankConfig};

/// Resolved configuration plus the shared bank handles.
pub struct App {
    pub config: QuizbankConfig,
    pub store: Arc<QuestionStore>,
    pub backups: Arc<BackupManager>,
}

impl App {
    pub fn load(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        let store = Arc::new(QuestionStore::new(config.bank_path()));
        if let Some(seed) = &config.seed_bank {
            store
                .ensure_seeded(seed)
                .with_context(|| format!("failed to seed bank from {}", seed.display()))?;
        }
        let backups = Arc::new(BackupManager::new(Arc::clone(&store), config.backup_dir()));

        Ok(Self {
            config,
            store,
            backups,
        })
    }

    pub fn exam(&self) -> ExamService {
        ExamService::new(Arc::clone(&self.store))
    }

    pub fn admin(&self) -> Result<AdminService> {
        let source = create_source(&self.config)?;
        let sync = RemoteSync::new(Arc::clone(&self.store), Arc::clone(&self.backups), source);
        Ok(AdminService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.backups),
            sync,
        ))
    }

    /// The session saved by the previous invocation, or a fresh one.
    pub fn load_session(&self) -> Session {
        let path = self.config.session_path();
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(_) => return Session::default(),
        };
        serde_json::from_slice(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable session {}: {e}", path.display());
            Session::default()
        })
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.config.session_path();
        std::fs::create_dir_all(&self.config.data_dir).with_context(|| {
            format!("failed to create data dir: {}", self.config.data_dir.display())
        })?;
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write session: {}", path.display()))?;
        Ok(())
    }
}

//! Admin-facing operations.
//!
//! Each operation reports success or failure with a message and never lets
//! an error escape; the typed errors underneath are logged and rendered into
//! the message.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backup::{BackupInfo, BackupManager};
use crate::model::Question;
use crate::session::Session;
use crate::store::QuestionStore;
use crate::sync::RemoteSync;

/// Result of an admin operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("{message}");
        Self {
            success: false,
            message,
        }
    }
}

/// Bank administration: edits, backups, restores and remote updates.
pub struct AdminService {
    store: Arc<QuestionStore>,
    backups: Arc<BackupManager>,
    sync: RemoteSync,
}

impl AdminService {
    pub fn new(store: Arc<QuestionStore>, backups: Arc<BackupManager>, sync: RemoteSync) -> Self {
        Self {
            store,
            backups,
            sync,
        }
    }

    /// The newest backups, newest first; empty if they cannot be listed.
    pub fn list_backups(&self) -> Vec<BackupInfo> {
        self.backups.list_backups().unwrap_or_else(|e| {
            tracing::error!("error getting backups: {e}");
            Vec::new()
        })
    }

    pub fn create_backup(&self) -> Outcome {
        match self.backups.create_backup() {
            Ok(path) => Outcome::ok(format!("Backup created: {}", path.display())),
            Err(e) => Outcome::failed(format!("Error creating backup: {e}")),
        }
    }

    /// Restore the backup with id `backup_id` (`YYYYMMDD_HHMM`).
    pub fn restore(&self, backup_id: &str, session: &mut Session) -> Outcome {
        let result = self
            .backups
            .resolve(backup_id)
            .and_then(|path| self.backups.restore(&path));
        match result {
            Ok(_) => {
                session.invalidate_bank_cache();
                Outcome::ok("Questions restored successfully!")
            }
            Err(e) => Outcome::failed(format!("Error restoring backup: {e}")),
        }
    }

    pub async fn update_from_remote(&self, session: &mut Session) -> Outcome {
        match self.sync.update_from_remote().await {
            Ok(summary) => {
                session.invalidate_bank_cache();
                Outcome::ok(format!(
                    "Questions updated successfully! {} questions loaded.",
                    summary.question_count
                ))
            }
            Err(e) => Outcome::failed(format!("Error updating questions: {e}")),
        }
    }

    /// The question at `index`, as the starting point for an edit.
    pub fn question(&self, index: usize) -> Option<Question> {
        let bank = self.store.load();
        QuestionStore::get_by_index(index, &bank).cloned()
    }

    pub fn edit_question(&self, index: usize, question: Question) -> Outcome {
        match self.store.edit_question(index, question) {
            Ok(()) => Outcome::ok("Question updated successfully"),
            Err(e) => Outcome::failed(format!("Error updating question: {e}")),
        }
    }

    pub fn save_all(&self, bank: &[Question]) -> Outcome {
        match self.store.save_all(bank) {
            Ok(()) => Outcome::ok(format!("Saved {} questions", bank.len())),
            Err(e) => Outcome::failed(format!("Error saving questions: {e}")),
        }
    }
}

//! Replace the local bank with the remote canonical copy.
//!
//! The replace is wholesale and destructive; the backup taken just before the
//! overwrite is the only way back. Nothing local changes unless the fetched
//! body is a valid question list and that backup succeeded.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backup::BackupManager;
use crate::error::SyncError;
use crate::parser::parse_bank_array;
use crate::store::QuestionStore;
use crate::traits::BankSource;

/// What a successful sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Backup of the bank as it was before the update.
    pub backup: PathBuf,
    /// Number of questions in the new bank.
    pub question_count: usize,
}

/// Pulls the canonical bank from a [`BankSource`].
pub struct RemoteSync {
    store: Arc<QuestionStore>,
    backups: Arc<BackupManager>,
    source: Arc<dyn BankSource>,
}

impl RemoteSync {
    pub fn new(
        store: Arc<QuestionStore>,
        backups: Arc<BackupManager>,
        source: Arc<dyn BankSource>,
    ) -> Self {
        Self {
            store,
            backups,
            source,
        }
    }

    /// Fetch, validate, back up, then overwrite the local bank.
    pub async fn update_from_remote(&self) -> Result<SyncSummary, SyncError> {
        tracing::info!(
            "fetching questions from {} ({})",
            self.source.location(),
            self.source.name()
        );
        let body = self
            .source
            .fetch()
            .await
            .map_err(|error| SyncError::Fetch {
                source_name: self.source.name().to_string(),
                error,
            })?;

        let questions = parse_bank_array(&body).map_err(SyncError::InvalidQuestionFormat)?;

        let backup = self.backups.create_backup()?;
        self.store.save(&questions)?;
        tracing::info!(
            "replaced local bank with {} questions (previous bank at {})",
            questions.len(),
            backup.display()
        );

        Ok(SyncSummary {
            backup,
            question_count: questions.len(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::fixtures::bank;
    use crate::time::Clock;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    /// Source returning a canned outcome.
    pub(crate) struct CannedSource(pub Result<Vec<u8>, u16>);

    #[async_trait]
    impl BankSource for CannedSource {
        fn name(&self) -> &str {
            "canned"
        }

        fn location(&self) -> &str {
            "memory://bank"
        }

        async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
            match &self.0 {
                Ok(body) => Ok(body.clone()),
                Err(0) => Err(FetchError::Network("connection refused".into())),
                Err(status) => Err(FetchError::Status {
                    status: *status,
                    url: self.location().into(),
                }),
            }
        }
    }

    fn setup(
        source: CannedSource,
    ) -> (tempfile::TempDir, Arc<QuestionStore>, Arc<BackupManager>, RemoteSync) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(QuestionStore::new(dir.path().join("test_questions.json")));
        store.save(&bank(2)).unwrap();
        let clock = Clock::fixed(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let backups = Arc::new(
            BackupManager::new(Arc::clone(&store), dir.path().join("backups")).with_clock(clock),
        );
        let sync = RemoteSync::new(Arc::clone(&store), Arc::clone(&backups), Arc::new(source));
        (dir, store, backups, sync)
    }

    #[tokio::test]
    async fn successful_update_replaces_bank() {
        let body = serde_json::to_vec(&bank(5)).unwrap();
        let (_dir, store, backups, sync) = setup(CannedSource(Ok(body)));

        let summary = sync.update_from_remote().await.unwrap();
        assert_eq!(summary.question_count, 5);
        assert_eq!(store.load().len(), 5);

        let listed = backups.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].path, summary.backup);
    }

    #[tokio::test]
    async fn transport_failure_changes_nothing() {
        let (_dir, store, backups, sync) = setup(CannedSource(Err(0)));
        let before = store.read_raw().unwrap();

        let err = sync.update_from_remote().await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch { .. }));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(store.read_raw().unwrap(), before);
        assert!(backups.list_backups().unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_changes_nothing() {
        let (_dir, store, _backups, sync) = setup(CannedSource(Err(404)));
        let before = store.read_raw().unwrap();
        let err = sync.update_from_remote().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        assert_eq!(store.read_raw().unwrap(), before);
    }

    #[tokio::test]
    async fn object_body_is_invalid_format() {
        let body = br#"{"questions": []}"#.to_vec();
        let (_dir, store, backups, sync) = setup(CannedSource(Ok(body)));
        let before = store.read_raw().unwrap();

        let err = sync.update_from_remote().await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidQuestionFormat(_)));
        assert_eq!(store.read_raw().unwrap(), before);
        assert!(backups.list_backups().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backup_failure_aborts() {
        let body = serde_json::to_vec(&bank(5)).unwrap();
        let (dir, store, _backups, sync) = setup(CannedSource(Ok(body)));
        // A regular file where the backup directory should be.
        std::fs::write(dir.path().join("backups"), b"in the way").unwrap();
        let before = store.read_raw().unwrap();

        let err = sync.update_from_remote().await.unwrap_err();
        assert!(matches!(err, SyncError::Backup(_)));
        assert_eq!(store.read_raw().unwrap(), before);
    }
}

//! Error types for the question bank and exam sessions.
//!
//! Each component gets its own enum so callers match on what can actually
//! go wrong at that seam. `FetchError` lives here (rather than in
//! `quizbank-remote`) so the sync orchestration can classify transport
//! failures without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`crate::store::QuestionStore`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The bank file does not exist.
    #[error("question bank not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The bank file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bank file is not valid JSON or does not match the question schema.
    #[error("malformed question bank {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No question exists at the requested index.
    #[error("question {index} not found (bank has {len} questions)")]
    QuestionNotFound { index: usize, len: usize },

    /// An edited question breaks the bank invariants.
    #[error("invalid question: {0}")]
    InvalidQuestion(String),
}

/// Errors raised while driving an attempt.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// The bank is empty, so no attempt can be created.
    #[error("no questions available")]
    NoQuestionsAvailable,

    /// The session holds no attempt.
    #[error("no attempt in progress")]
    NoAttempt,

    /// The selected bank index no longer resolves (the bank shrank).
    #[error("question {index} is no longer available")]
    QuestionUnavailable { index: usize },

    /// Every question has been visited; the attempt must be scored.
    #[error("attempt is complete")]
    AttemptComplete,

    /// An answer was submitted for a position outside the attempt.
    #[error("position {position} is outside the attempt ({total} questions)")]
    PositionOutOfRange { position: usize, total: usize },
}

/// Errors raised by [`crate::backup::BackupManager`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackupError {
    /// The live bank could not be read, so there is nothing to snapshot.
    #[error("cannot read question bank {}: {source}", path.display())]
    BankUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup directory or file could not be created or written.
    #[error("cannot write backup {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested backup does not exist.
    #[error("backup not found: {0}")]
    BackupNotFound(String),

    /// The backup is not a JSON array of questions.
    #[error("invalid backup file format: {0}")]
    InvalidBackupFormat(String),

    /// Writing the restored content to the live bank failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a [`crate::traits::BankSource`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network or body-read error occurred.
    #[error("network error: {0}")]
    Network(String),
}

/// Errors raised by [`crate::sync::RemoteSync`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The mandatory pre-update backup failed; nothing was changed.
    #[error("failed to create backup: {0}")]
    Backup(#[from] BackupError),

    /// The remote could not be fetched; nothing was changed.
    #[error("failed to fetch questions from {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: FetchError,
    },

    /// The remote body is not a JSON array of questions.
    #[error("invalid question format: {0}")]
    InvalidQuestionFormat(String),

    /// Writing the fetched bank failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

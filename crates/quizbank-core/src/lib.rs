//! quizbank-core — Question bank, exam sessions, scoring and backups.
//!
//! This crate owns the bank file and everything that reads or rewrites it:
//! the store, the per-user attempt state machine, the scoring engine, the
//! backup manager and the remote-sync orchestration.

pub mod admin;
pub mod backup;
pub mod error;
pub mod exam;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod store;
pub mod sync;
pub mod time;
pub mod traits;

//! quizbank-remote — where replacement banks come from.
//!
//! Implements the `BankSource` trait over HTTPS and in memory, and loads the
//! TOML configuration that decides which source and data directory to use.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, load_config_from, QuizbankConfig};
pub use http::HttpBankSource;
pub use mock::MockSource;

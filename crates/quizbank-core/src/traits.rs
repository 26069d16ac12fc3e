//! Trait for the remote canonical copy of the bank.
//!
//! Implemented by the `quizbank-remote` crate.

use async_trait::async_trait;

use crate::error::FetchError;

/// Where a replacement bank is fetched from.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Human-readable source name (e.g. "https").
    fn name(&self) -> &str;

    /// Where the bank is fetched from, for messages.
    fn location(&self) -> &str;

    /// Fetch the raw body of the canonical bank.
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

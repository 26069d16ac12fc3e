//! HTTPS source for the canonical bank.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use quizbank_core::error::FetchError;
use quizbank_core::traits::BankSource;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches the bank with a single `GET`.
pub struct HttpBankSource {
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBankSource {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("quizbank/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            timeout_secs,
            client,
        })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            FetchError::Network(format!("{} not reachable: {e}", self.url))
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl BankSource for HttpBankSource {
    fn name(&self) -> &str {
        "https"
    }

    fn location(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        tracing::debug!("fetched {} bytes", body.len());
        Ok(body.to_vec())
    }
}

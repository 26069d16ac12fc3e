//! In-memory source for testing sync without a network.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use quizbank_core::error::FetchError;
use quizbank_core::model::Question;
use quizbank_core::traits::BankSource;

enum Canned {
    Body(Vec<u8>),
    Status(u16),
    Unreachable,
}

/// A [`BankSource`] that returns a canned response and counts fetches.
pub struct MockSource {
    response: Canned,
    call_count: AtomicU32,
}

impl MockSource {
    fn new(response: Canned) -> Self {
        Self {
            response,
            call_count: AtomicU32::new(0),
        }
    }

    /// Serve `body` verbatim.
    pub fn with_body(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Canned::Body(body.into()))
    }

    /// Serve `questions` as a JSON array.
    pub fn with_questions(questions: &[Question]) -> Result<Self, serde_json::Error> {
        Ok(Self::with_body(serde_json::to_vec(questions)?))
    }

    /// Answer every fetch with an HTTP error status.
    pub fn with_status(status: u16) -> Self {
        Self::new(Canned::Status(status))
    }

    /// Fail every fetch as if the host were down.
    pub fn unreachable() -> Self {
        Self::new(Canned::Unreachable)
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BankSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn location(&self) -> &str {
        "mock://questions"
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.response {
            Canned::Body(body) => Ok(body.clone()),
            Canned::Status(status) => Err(FetchError::Status {
                status: *status,
                url: self.location().to_string(),
            }),
            Canned::Unreachable => Err(FetchError::Network("host unreachable".into())),
        }
    }
}

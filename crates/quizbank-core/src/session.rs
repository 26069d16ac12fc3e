//! Per-user attempt state and the session that carries it.
//!
//! An [`Attempt`] walks `NoAttempt -> InProgress -> Complete`. It stores bank
//! indices, never question copies, so it stays small enough to live in
//! whatever session storage the caller provides.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{normalize_letters, Question};
use crate::store::QuestionStore;

/// Question count used when the caller does not ask for one.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Where an attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    InProgress { position: usize, total: usize },
    Complete,
}

/// One user's run through a random subset of the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    /// Distinct bank indices in draw order; fixed for the whole attempt.
    pub selected_indices: Vec<usize>,
    pub current_position: usize,
    /// Position -> submitted letters. Entries are never removed.
    pub answers: BTreeMap<usize, BTreeSet<String>>,
    pub start_time: DateTime<Utc>,
}

impl Attempt {
    /// Start an attempt over a bank of `bank_len` questions.
    pub fn start(
        requested_count: usize,
        bank_len: usize,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(requested_count, bank_len, now, &mut rand::rng())
    }

    /// Like [`Attempt::start`] with a caller-supplied RNG.
    pub fn start_with_rng<R: Rng + ?Sized>(
        requested_count: usize,
        bank_len: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if bank_len == 0 {
            return Err(SessionError::NoQuestionsAvailable);
        }
        let count = requested_count.min(bank_len);
        let selected_indices = rand::seq::index::sample(rng, bank_len, count).into_vec();

        Ok(Self {
            id: Uuid::new_v4(),
            selected_indices,
            current_position: 0,
            answers: BTreeMap::new(),
            start_time: now,
        })
    }

    /// Number of questions in the attempt.
    pub fn len(&self) -> usize {
        self.selected_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_indices.is_empty()
    }

    pub fn state(&self) -> AttemptState {
        if self.current_position >= self.len() {
            AttemptState::Complete
        } else {
            AttemptState::InProgress {
                position: self.current_position,
                total: self.len(),
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == AttemptState::Complete
    }

    /// Resolve the question under the cursor.
    pub fn current<'b>(&self, bank: &'b [Question]) -> Result<&'b Question, SessionError> {
        let index = *self
            .selected_indices
            .get(self.current_position)
            .ok_or(SessionError::AttemptComplete)?;
        QuestionStore::get_by_index(index, bank).ok_or(SessionError::QuestionUnavailable { index })
    }

    /// Record the letters chosen for `position`.
    ///
    /// An empty selection leaves any earlier answer for that position as is.
    /// Returns whether anything was recorded.
    pub fn submit_answer<I, S>(&mut self, position: usize, letters: I) -> Result<bool, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if position >= self.len() {
            return Err(SessionError::PositionOutOfRange {
                position,
                total: self.len(),
            });
        }
        let letters = normalize_letters(letters);
        if letters.is_empty() {
            return Ok(false);
        }
        self.answers.insert(position, letters);
        Ok(true)
    }

    /// The letters recorded for `position`, if any.
    pub fn answer(&self, position: usize) -> Option<&BTreeSet<String>> {
        self.answers.get(&position)
    }

    /// Move the cursor forward, returning the new state.
    pub fn advance(&mut self) -> AttemptState {
        if self.current_position < self.len() {
            self.current_position += 1;
        }
        self.state()
    }
}

/// The per-user container stored in session storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub attempt: Option<Attempt>,
    /// Bank length seen at the last resolution; cleared when the bank is
    /// replaced by an admin action.
    #[serde(default)]
    pub bank_len: Option<usize>,
}

impl Session {
    /// Drop the attempt and every cached key.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Forget bank-derived cache so the next access reloads the bank.
    pub fn invalidate_bank_cache(&mut self) {
        self.bank_len = None;
    }

    /// Record the current bank length, reporting whether it changed under
    /// the session without an invalidation.
    pub fn observe_bank(&mut self, len: usize) -> bool {
        let changed = self.bank_len.is_some_and(|cached| cached != len);
        self.bank_len = Some(len);
        changed
    }
}

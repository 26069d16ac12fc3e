//! Session-facing operations: the exam flow a presentation layer drives.
//!
//! Every operation works on a caller-owned [`Session`]. Failures that the
//! user can recover from by starting over come back as
//! [`Navigation::Home`] rather than as errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{choice_letter, Question};
use crate::scoring::{score, ScoreReport};
use crate::session::{Attempt, AttemptState, Session, DEFAULT_QUESTION_COUNT};
use crate::store::QuestionStore;
use crate::time::Clock;

/// Test lengths offered on the home screen.
pub const QUESTION_COUNT_OPTIONS: [usize; 4] = [10, 35, 70, 140];

/// What the home screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeView {
    pub total_questions: usize,
    pub count_options: Vec<usize>,
}

/// A labelled choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub letter: String,
    pub text: String,
}

/// The question under the cursor, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// 0-based position within the attempt.
    pub position: usize,
    pub total: usize,
    pub ksa: Option<String>,
    pub question: String,
    pub choices: Vec<ChoiceView>,
    /// Letters recorded earlier for this position.
    pub previous_answer: Vec<String>,
    /// Whether more than one choice is correct.
    pub multi_select: bool,
}

/// Where the caller should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Question(QuestionView),
    Results,
    Home { reason: String },
}

/// Drives attempts against the bank.
pub struct ExamService {
    store: Arc<QuestionStore>,
    clock: Clock,
}

impl ExamService {
    pub fn new(store: Arc<QuestionStore>) -> Self {
        Self {
            store,
            clock: Clock::System,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Return to the home screen, discarding any attempt.
    pub fn home(&self, session: &mut Session) -> HomeView {
        session.clear();
        let total_questions = self.store.load().len();
        let mut count_options: Vec<usize> = QUESTION_COUNT_OPTIONS
            .into_iter()
            .filter(|&n| n <= total_questions)
            .collect();
        if count_options.is_empty() {
            count_options.push(total_questions.min(DEFAULT_QUESTION_COUNT));
        }
        HomeView {
            total_questions,
            count_options,
        }
    }

    /// Start a fresh attempt of `count` questions, replacing any existing one.
    ///
    /// A zero-length attempt is complete on arrival and goes straight to
    /// [`Navigation::Results`].
    pub fn start(&self, session: &mut Session, count: usize) -> Result<Navigation, SessionError> {
        let bank = self.store.load();
        let attempt = Attempt::start(count, bank.len(), self.clock.now())?;
        tracing::info!(
            "started attempt {} with {} of {} questions",
            attempt.id,
            attempt.len(),
            bank.len()
        );

        session.clear();
        session.bank_len = Some(bank.len());
        let nav = if attempt.is_complete() {
            Navigation::Results
        } else {
            Navigation::Question(render(&attempt, &bank)?)
        };
        session.attempt = Some(attempt);
        Ok(nav)
    }

    /// Show the question under the cursor.
    pub fn view_current(&self, session: &mut Session) -> Navigation {
        let bank = self.store.load();
        if session.observe_bank(bank.len()) {
            tracing::warn!("question bank changed during the attempt");
        }
        let Some(attempt) = session.attempt.as_ref() else {
            return home("no test in progress");
        };
        if attempt.is_complete() {
            return Navigation::Results;
        }
        match render(attempt, &bank) {
            Ok(view) => Navigation::Question(view),
            Err(e) => {
                tracing::warn!("error loading question: {e}");
                home("error loading question")
            }
        }
    }

    /// Record the selection for the current question and move on.
    pub fn submit_and_advance<I, S>(&self, session: &mut Session, selections: I) -> Navigation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bank = self.store.load();
        let Some(attempt) = session.attempt.as_mut() else {
            return home("no test in progress");
        };
        if attempt.is_complete() {
            return Navigation::Results;
        }
        if let Err(e) = attempt.current(&bank) {
            tracing::warn!("error loading question: {e}");
            return home("error loading question");
        }

        let position = attempt.current_position;
        if let Err(e) = attempt.submit_answer(position, selections) {
            return home(&e.to_string());
        }
        match attempt.advance() {
            AttemptState::Complete => Navigation::Results,
            AttemptState::InProgress { .. } => self.view_current(session),
        }
    }

    /// Score the attempt as of now.
    pub fn view_results(&self, session: &Session) -> Result<ScoreReport, SessionError> {
        let attempt = session.attempt.as_ref().ok_or(SessionError::NoAttempt)?;
        let bank = self.store.load();
        Ok(score(attempt, &bank, self.clock.now()))
    }
}

fn home(reason: &str) -> Navigation {
    Navigation::Home {
        reason: reason.to_string(),
    }
}

fn render(attempt: &Attempt, bank: &[Question]) -> Result<QuestionView, SessionError> {
    let question = attempt.current(bank)?;
    let choices = question
        .choices
        .iter()
        .enumerate()
        .map(|(i, text)| ChoiceView {
            letter: choice_letter(i).map(String::from).unwrap_or_default(),
            text: text.clone(),
        })
        .collect();

    Ok(QuestionView {
        position: attempt.current_position,
        total: attempt.len(),
        ksa: question.ksa.clone(),
        question: question.question.clone(),
        choices,
        previous_answer: attempt
            .answer(attempt.current_position)
            .map(|a| a.iter().cloned().collect())
            .unwrap_or_default(),
        multi_select: question.correct_set().len() > 1,
    })
}

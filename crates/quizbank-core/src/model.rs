//! Core data model types for quizbank.
//!
//! A bank is an ordered `Vec<Question>`; a question's position in that
//! vector is its identity for the lifetime of one attempt.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Knowledge/Skill/Ability category code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ksa: Option<String>,
    /// The question text.
    pub question: String,
    /// Option strings; the label of each is implied by its position.
    pub choices: Vec<String>,
    /// Letters of the correct choices.
    pub correct_answers: Vec<String>,
    /// Explanation shown with the results.
    #[serde(default)]
    pub explanation: String,
    /// Regulation citations shown alongside the explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulations: Option<Vec<Citation>>,
}

/// A reference into the regulatory text backing a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub title: String,
}

/// The label of the choice at `position` (`0 -> 'A'`).
///
/// Returns `None` past `'Z'`.
pub fn choice_letter(position: usize) -> Option<char> {
    u8::try_from(position)
        .ok()
        .filter(|p| *p < 26)
        .map(|p| char::from(b'A' + p))
}

/// Normalize a user selection into a set of upper-case letters.
///
/// Blank entries are dropped, so an all-blank selection is empty.
pub fn normalize_letters<I, S>(letters: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    letters
        .into_iter()
        .map(|l| l.as_ref().trim().to_uppercase())
        .filter(|l| !l.is_empty())
        .collect()
}

impl Question {
    /// Letters labelling this question's choices, in order.
    pub fn choice_letters(&self) -> Vec<String> {
        (0..self.choices.len())
            .filter_map(choice_letter)
            .map(String::from)
            .collect()
    }

    /// The correct letters as a set.
    pub fn correct_set(&self) -> BTreeSet<String> {
        normalize_letters(&self.correct_answers)
    }

    /// Citations, empty when the question has none.
    pub fn citations(&self) -> &[Citation] {
        self.regulations.as_deref().unwrap_or_default()
    }

    /// Check the invariants an edited question must satisfy.
    pub fn check(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.choices.is_empty() {
            return Err("question has no choices".into());
        }
        if self.choices.len() > 26 {
            return Err(format!("too many choices: {}", self.choices.len()));
        }
        let correct = self.correct_set();
        if correct.is_empty() {
            return Err("no correct answers given".into());
        }
        let letters: BTreeSet<String> = self.choice_letters().into_iter().collect();
        let unknown: Vec<&str> = correct
            .iter()
            .filter(|l| !letters.contains(*l))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(format!(
                "correct answers not among the choices: {}",
                unknown.join(", ")
            ));
        }
        Ok(())
    }
}

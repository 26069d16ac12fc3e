//! Attempt scoring.
//!
//! Correctness is exact set equality between the submitted letters and the
//! question's correct letters; there is no partial credit. Positions whose
//! bank index no longer resolves are skipped and count toward neither the
//! numerator nor the denominator.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Citation, Question};
use crate::session::Attempt;
use crate::store::QuestionStore;

/// Outcome of a single scored question, self-contained for a results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// Position within the attempt.
    pub position: usize,
    /// Index into the bank.
    pub bank_index: usize,
    pub question: String,
    pub choices: Vec<String>,
    /// Sorted letters the user submitted (empty if unanswered).
    pub user_answers: Vec<String>,
    /// Sorted correct letters.
    pub correct_answers: Vec<String>,
    pub is_correct: bool,
    pub explanation: String,
    pub regulations: Vec<Citation>,
}

/// A scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub attempt_id: uuid::Uuid,
    /// Percentage of scored questions answered correctly.
    pub score_percent: f64,
    pub correct_count: usize,
    pub scored_count: usize,
    /// Number of questions in the attempt, scored or not.
    pub total_questions: usize,
    /// Positions skipped because their question no longer resolves.
    pub skipped: Vec<usize>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Wall-clock seconds from start to completion.
    pub elapsed_secs: i64,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    /// Elapsed time formatted as `H:MM:SS`.
    pub fn elapsed_display(&self) -> String {
        let secs = self.elapsed_secs.max(0);
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Score `attempt` against `bank` as of `completed_at`.
pub fn score(attempt: &Attempt, bank: &[Question], completed_at: DateTime<Utc>) -> ScoreReport {
    let mut results = Vec::with_capacity(attempt.len());
    let mut skipped = Vec::new();

    for (position, &bank_index) in attempt.selected_indices.iter().enumerate() {
        let Some(question) = QuestionStore::get_by_index(bank_index, bank) else {
            tracing::warn!("question {bank_index} at position {position} no longer exists, skipping");
            skipped.push(position);
            continue;
        };

        let user: BTreeSet<String> = attempt.answer(position).cloned().unwrap_or_default();
        let correct = question.correct_set();
        let is_correct = user == correct;

        results.push(QuestionResult {
            position,
            bank_index,
            question: question.question.clone(),
            choices: question.choices.clone(),
            user_answers: user.into_iter().collect(),
            correct_answers: correct.into_iter().collect(),
            is_correct,
            explanation: question.explanation.clone(),
            regulations: question.citations().to_vec(),
        });
    }

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    let scored_count = results.len();
    let score_percent = if scored_count == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / scored_count as f64
    };

    ScoreReport {
        attempt_id: attempt.id,
        score_percent,
        correct_count,
        scored_count,
        total_questions: attempt.len(),
        skipped,
        started_at: attempt.start_time,
        completed_at,
        elapsed_secs: (completed_at - attempt.start_time).num_seconds(),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{bank, question};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn attempt_over(indices: Vec<usize>) -> Attempt {
        let mut attempt = Attempt::start(indices.len(), indices.len(), t0()).unwrap();
        attempt.selected_indices = indices;
        attempt
    }

    #[test]
    fn exact_set_equality() {
        let questions = vec![question("multi", &["A", "C"])];
        let cases: [(&[&str], bool); 4] = [
            (&["A"], false),
            (&["A", "C"], true),
            (&["c", "a"], true),
            (&["A", "C", "D"], false),
        ];
        for (submitted, expected) in cases {
            let mut attempt = attempt_over(vec![0]);
            attempt.submit_answer(0, submitted).unwrap();
            let report = score(&attempt, &questions, t0());
            assert_eq!(report.results[0].is_correct, expected, "{submitted:?}");
        }
    }

    #[test]
    fn unanswered_is_wrong() {
        let attempt = attempt_over(vec![0, 1]);
        let report = score(&attempt, &bank(2), t0());
        assert_eq!(report.correct_count, 0);
        assert_eq!(report.scored_count, 2);
        assert!(report.results[0].user_answers.is_empty());
        assert_eq!(report.score_percent, 0.0);
    }

    #[test]
    fn percent_and_sorted_answers() {
        let questions = vec![
            question("one", &["C", "A"]),
            question("two", &["B"]),
            question("three", &["D"]),
            question("four", &["A"]),
        ];
        let mut attempt = attempt_over(vec![2, 0, 3, 1]);
        attempt.submit_answer(0, ["D"]).unwrap();
        attempt.submit_answer(1, ["C", "A"]).unwrap();
        attempt.submit_answer(2, ["B"]).unwrap();

        let report = score(&attempt, &questions, t0() + Duration::seconds(754));
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.score_percent, 50.0);
        assert_eq!(report.results[1].user_answers, vec!["A", "C"]);
        assert_eq!(report.results[1].correct_answers, vec!["A", "C"]);
        assert_eq!(report.results[1].bank_index, 0);
        assert_eq!(report.results[1].regulations[0].id, "F600");
        assert_eq!(report.elapsed_secs, 754);
        assert_eq!(report.elapsed_display(), "0:12:34");
    }

    #[test]
    fn missing_questions_are_skipped() {
        let mut attempt = attempt_over(vec![0, 4, 1]);
        attempt.submit_answer(0, ["A"]).unwrap();
        attempt.submit_answer(1, ["A"]).unwrap();

        let report = score(&attempt, &bank(2), t0());
        assert_eq!(report.skipped, vec![1]);
        assert_eq!(report.scored_count, 2);
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.score_percent, 50.0);
    }

    #[test]
    fn nothing_scored_is_zero() {
        let attempt = attempt_over(vec![5, 6]);
        let report = score(&attempt, &bank(1), t0());
        assert_eq!(report.scored_count, 0);
        assert_eq!(report.score_percent, 0.0);
    }
}

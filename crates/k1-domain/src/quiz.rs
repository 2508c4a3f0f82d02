//! Multiple-choice quiz definitions and stored attempt results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }

    pub fn correct_text(&self) -> Option<&str> {
        self.options.get(self.correct_option).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
}

impl Keyed for Quiz {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Titled for Quiz {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Displayable for Quiz {
    fn display_label(&self) -> String {
        format!(
            "{} [{}] - {} questions",
            self.title,
            self.difficulty,
            self.questions.len()
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Last recorded outcome for a quiz. One per quiz id; a retake overwrites it.
pub struct QuizAttemptResult {
    pub score: u32,
    pub total_questions: u32,
    pub date: DateTime<Utc>,
}

impl QuizAttemptResult {
    /// Whole-number percentage, rounded half away from zero.
    pub fn percentage(&self) -> u32 {
        percentage(self.score.into(), self.total_questions.into())
    }

    /// At least one question and no more correct answers than questions.
    pub fn is_consistent(&self) -> bool {
        self.total_questions > 0 && self.score <= self.total_questions
    }
}

/// Persisted map of quiz id to last result.
pub type QuizResults = BTreeMap<String, QuizAttemptResult>;

pub fn percentage(score: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(u64::from(u32::MAX) * 2, u64::from(u32::MAX) * 2), 100);
    }

    #[test]
    fn attempt_result_consistency() {
        let at = |score, total_questions| QuizAttemptResult {
            score,
            total_questions,
            date: Utc::now(),
        };
        assert!(at(3, 5).is_consistent());
        assert!(at(0, 1).is_consistent());
        assert!(!at(7, 3).is_consistent());
        assert!(!at(0, 0).is_consistent());
    }

    #[test]
    fn attempt_result_uses_stored_field_names() {
        let raw = r#"{"score":3,"totalQuestions":5,"date":"2024-03-01T10:00:00.000Z"}"#;
        let parsed: QuizAttemptResult = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.score, 3);
        assert_eq!(parsed.total_questions, 5);
        assert_eq!(parsed.percentage(), 60);
    }
}

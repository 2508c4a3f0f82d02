//! Scenario play for a single game level: fill-in answers checked per question.

use k1_domain::{GameQuestion, GameScenario};

use crate::CoreError;

/// Attempts after which the learner may move on even without a correct check.
pub const DEFAULT_REVEAL_AFTER_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResult {
    pub field_id: String,
    pub label: String,
    pub submitted: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub correct: bool,
    pub attempts: u32,
    pub fields: Vec<FieldResult>,
    pub explanation: String,
    /// Set when the final question was answered correctly.
    pub level_cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAdvance {
    Next { index: usize },
    LevelFinished,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    level_id: String,
    scenario: GameScenario,
    current: usize,
    attempts: u32,
    last_check: Option<bool>,
    reveal_after: u32,
    cleared: bool,
}

impl GameSession {
    pub fn new(level_id: impl Into<String>, scenario: GameScenario) -> Result<Self, CoreError> {
        Self::with_reveal_after(level_id, scenario, DEFAULT_REVEAL_AFTER_ATTEMPTS)
    }

    pub fn with_reveal_after(
        level_id: impl Into<String>,
        scenario: GameScenario,
        reveal_after: u32,
    ) -> Result<Self, CoreError> {
        if scenario.questions.is_empty() {
            return Err(CoreError::Validation(format!(
                "scenario `{}` has no questions",
                scenario.id
            )));
        }
        Ok(Self {
            level_id: level_id.into(),
            scenario,
            current: 0,
            attempts: 0,
            last_check: None,
            reveal_after: reveal_after.max(1),
            cleared: false,
        })
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn scenario(&self) -> &GameScenario {
        &self.scenario
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &GameQuestion {
        &self.scenario.questions[self.current]
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.scenario.questions.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Checks positional answers against the current question's fields.
    /// Missing answers count as empty. Every check consumes one attempt.
    ///
    /// A checked question stays locked until [`GameSession::retry`] or
    /// [`GameSession::advance`].
    pub fn check(&mut self, answers: &[&str]) -> Result<CheckOutcome, CoreError> {
        if self.last_check.is_some() {
            return Err(CoreError::QuestionLocked);
        }
        let question = &self.scenario.questions[self.current];
        let fields: Vec<FieldResult> = question
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let submitted = answers.get(index).copied().unwrap_or_default();
                FieldResult {
                    field_id: field.id.clone(),
                    label: field.label.clone(),
                    submitted: submitted.trim().to_string(),
                    correct: field.accepts(submitted),
                }
            })
            .collect();
        let correct = fields.iter().all(|field| field.correct);
        let explanation = question.explanation.clone();

        self.attempts += 1;
        self.last_check = Some(correct);
        let level_cleared = correct && self.is_last_question();
        if level_cleared {
            self.cleared = true;
        }
        Ok(CheckOutcome {
            correct,
            attempts: self.attempts,
            fields,
            explanation,
            level_cleared,
        })
    }

    /// Whether the last check was wrong and the answer is still hidden.
    pub fn can_retry(&self) -> bool {
        self.last_check == Some(false) && self.attempts < self.reveal_after
    }

    /// Hides a wrong check so the learner can answer again. Attempts are kept.
    pub fn retry(&mut self) -> Result<(), CoreError> {
        match self.last_check {
            None => Err(CoreError::InvalidOperation(
                "nothing to retry yet, check an answer first".into(),
            )),
            Some(true) => Err(CoreError::InvalidOperation(
                "this question is already answered correctly, type `next`".into(),
            )),
            Some(false) if !self.can_retry() => Err(CoreError::InvalidOperation(
                "the answer has been revealed, type `next` to move on".into(),
            )),
            Some(false) => {
                self.last_check = None;
                Ok(())
            }
        }
    }

    pub fn can_advance(&self) -> bool {
        match self.last_check {
            Some(true) => true,
            Some(false) => self.attempts >= self.reveal_after,
            None => false,
        }
    }

    pub fn advance(&mut self) -> Result<GameAdvance, CoreError> {
        if !self.can_advance() {
            return Err(CoreError::InvalidOperation(
                "check a correct answer first, or try again".into(),
            ));
        }
        if self.is_last_question() {
            return Ok(GameAdvance::LevelFinished);
        }
        self.current += 1;
        self.attempts = 0;
        self.last_check = None;
        Ok(GameAdvance::Next {
            index: self.current,
        })
    }
}

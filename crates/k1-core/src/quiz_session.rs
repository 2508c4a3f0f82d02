//! Sequential multiple-choice session with per-question answer locking.

use k1_domain::{Decimal, Quiz, QuizQuestion, SignedAmount};
use rust_decimal::prelude::ToPrimitive;

use crate::{calculator::running_total, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Answered { selected: usize, correct: bool },
}

impl AnswerState {
    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerState::Answered { .. })
    }
}

impl SignedAmount for AnswerState {
    fn signed_amount(&self) -> Decimal {
        match self {
            AnswerState::Answered { correct: true, .. } => Decimal::ONE,
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed,
}

/// What the learner sees right after locking an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub selected: usize,
    pub correct_option: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    Next { index: usize },
    Finished { score: u32, total: u32 },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    answers: Vec<AnswerState>,
    state: SessionState,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Result<Self, CoreError> {
        if quiz.questions.is_empty() {
            return Err(CoreError::Validation(format!(
                "quiz `{}` has no questions",
                quiz.id
            )));
        }
        let answers = vec![AnswerState::Unanswered; quiz.questions.len()];
        Ok(Self {
            quiz,
            current: 0,
            answers,
            state: SessionState::InProgress,
        })
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.quiz.questions[self.current]
    }

    pub fn current_answer(&self) -> AnswerState {
        self.answers[self.current]
    }

    pub fn total_questions(&self) -> u32 {
        self.answers.len() as u32
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> u32 {
        running_total(Decimal::ZERO, &self.answers)
            .to_u32()
            .unwrap_or(0)
    }

    /// Locks `option` in as the answer to the current question.
    pub fn answer(&mut self, option: usize) -> Result<AnswerFeedback, CoreError> {
        if self.is_completed() {
            return Err(CoreError::SessionCompleted);
        }
        if self.current_answer().is_answered() {
            return Err(CoreError::QuestionLocked);
        }
        let question = &self.quiz.questions[self.current];
        if option >= question.options.len() {
            return Err(CoreError::Validation(format!(
                "choose an option between 1 and {}",
                question.options.len()
            )));
        }
        let correct = question.is_correct(option);
        let feedback = AnswerFeedback {
            correct,
            selected: option,
            correct_option: question.correct_option,
            explanation: question.explanation.clone(),
        };
        self.answers[self.current] = AnswerState::Answered {
            selected: option,
            correct,
        };
        Ok(feedback)
    }

    /// Moves past an answered question; past the last one the session completes.
    pub fn advance(&mut self) -> Result<QuizAdvance, CoreError> {
        if self.is_completed() {
            return Err(CoreError::SessionCompleted);
        }
        if !self.current_answer().is_answered() {
            return Err(CoreError::QuestionUnanswered);
        }
        if self.current + 1 < self.answers.len() {
            self.current += 1;
            return Ok(QuizAdvance::Next {
                index: self.current,
            });
        }
        self.state = SessionState::Completed;
        Ok(QuizAdvance::Finished {
            score: self.score(),
            total: self.total_questions(),
        })
    }
}

//! Stored quiz results and game level progress.

use std::sync::Arc;

use k1_domain::{percentage, Level, LevelProgress, Quiz, QuizAttemptResult, QuizResults};
use tracing::{debug, info, warn};

use crate::{
    storage::{read_json, write_json, KeyValueStore, GAME_PROGRESS_KEY, QUIZ_RESULTS_KEY},
    time::Clock,
    CoreError,
};

/// Outcome of finishing a quiz, computed before the stored result is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResultReport {
    pub result: QuizAttemptResult,
    pub previous: Option<QuizAttemptResult>,
    pub new_best: bool,
}

impl QuizResultReport {
    pub fn percentage(&self) -> u32 {
        self.result.percentage()
    }

    pub fn feedback(&self) -> &'static str {
        feedback_for(self.percentage())
    }
}

pub fn feedback_for(percentage: u32) -> &'static str {
    if percentage >= 90 {
        "Excellent! You have a strong understanding of this topic."
    } else if percentage >= 70 {
        "Good job! You have a solid grasp of the material."
    } else if percentage >= 50 {
        "You're making progress! Review the areas you missed and try again."
    } else {
        "Keep studying! Review the material and try again to improve your score."
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgressRow {
    pub quiz_id: String,
    pub title: String,
    pub result: QuizAttemptResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOverview {
    pub overall_percentage: u32,
    pub completed: usize,
    pub available: usize,
    pub rows: Vec<QuizProgressRow>,
}

pub const UNKNOWN_QUIZ_TITLE: &str = "Unknown Quiz";

pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stored results. Records with no questions or more correct answers
    /// than questions are skipped.
    pub fn quiz_results(&self) -> Result<QuizResults, CoreError> {
        let results = match read_json::<QuizResults>(self.store.as_ref(), QUIZ_RESULTS_KEY) {
            Ok(results) => results.unwrap_or_default(),
            Err(CoreError::CorruptRecord { key, reason }) => {
                warn!(%key, %reason, "quiz results unreadable, treating as empty");
                return Ok(QuizResults::new());
            }
            Err(err) => return Err(err),
        };
        Ok(results
            .into_iter()
            .filter(|(quiz_id, result)| {
                let consistent = result.is_consistent();
                if !consistent {
                    warn!(
                        quiz_id = %quiz_id,
                        score = result.score,
                        total = result.total_questions,
                        "skipping inconsistent quiz result"
                    );
                }
                consistent
            })
            .collect())
    }

    /// Stores `score / total` for `quiz_id`, replacing any earlier result.
    pub fn record_quiz_result(
        &self,
        quiz_id: &str,
        score: u32,
        total: u32,
    ) -> Result<QuizResultReport, CoreError> {
        if total == 0 {
            return Err(CoreError::Validation("a quiz needs at least one question".into()));
        }
        if score > total {
            return Err(CoreError::Validation(format!(
                "score {score} exceeds {total} questions"
            )));
        }
        let mut results = self.quiz_results()?;
        let previous = results.get(quiz_id).copied();
        let result = QuizAttemptResult {
            score,
            total_questions: total,
            date: self.clock.now(),
        };
        results.insert(quiz_id.to_string(), result);
        write_json(self.store.as_ref(), QUIZ_RESULTS_KEY, &results)?;
        info!(quiz_id, score, total, "quiz result recorded");
        Ok(QuizResultReport {
            result,
            previous,
            new_best: previous.map_or(true, |prior| score > prior.score),
        })
    }

    /// Aggregates stored results against the quiz catalogue.
    pub fn overview(&self, catalogue: &[Quiz]) -> Result<ProgressOverview, CoreError> {
        let results = self.quiz_results()?;
        let (score, total) = results.values().fold((0u64, 0u64), |(s, t), result| {
            (s + u64::from(result.score), t + u64::from(result.total_questions))
        });
        let rows = results
            .iter()
            .map(|(quiz_id, result)| QuizProgressRow {
                quiz_id: quiz_id.clone(),
                title: catalogue
                    .iter()
                    .find(|quiz| &quiz.id == quiz_id)
                    .map(|quiz| quiz.title.clone())
                    .unwrap_or_else(|| UNKNOWN_QUIZ_TITLE.to_string()),
                result: *result,
            })
            .collect();
        Ok(ProgressOverview {
            overall_percentage: percentage(score, total),
            completed: results.len(),
            available: catalogue.len(),
            rows,
        })
    }

    /// Reads level progress, seeding it from `defaults` the first time.
    /// Only the first default level starts unlocked.
    pub fn game_levels(&self, defaults: &[Level]) -> Result<Vec<LevelProgress>, CoreError> {
        match read_json::<Vec<LevelProgress>>(self.store.as_ref(), GAME_PROGRESS_KEY) {
            Ok(Some(levels)) => return Ok(levels),
            Ok(None) => {}
            Err(CoreError::CorruptRecord { key, reason }) => {
                warn!(%key, %reason, "game progress unreadable, reseeding");
            }
            Err(err) => return Err(err),
        }
        let seeded: Vec<LevelProgress> = defaults
            .iter()
            .enumerate()
            .map(|(index, level)| LevelProgress::from_level(level, index > 0))
            .collect();
        write_json(self.store.as_ref(), GAME_PROGRESS_KEY, &seeded)?;
        debug!(levels = seeded.len(), "game progress seeded");
        Ok(seeded)
    }

    /// Returns the level when it exists and is unlocked.
    pub fn start_level(&self, defaults: &[Level], level_id: &str) -> Result<LevelProgress, CoreError> {
        let level = self
            .game_levels(defaults)?
            .into_iter()
            .find(|level| level.id == level_id)
            .ok_or_else(|| CoreError::LevelNotFound(level_id.to_string()))?;
        if level.locked {
            return Err(CoreError::LevelLocked(level_id.to_string()));
        }
        Ok(level)
    }

    /// Marks `level_id` completed and unlocks the level numbered one higher.
    pub fn complete_level(
        &self,
        defaults: &[Level],
        level_id: &str,
    ) -> Result<Vec<LevelProgress>, CoreError> {
        let mut levels = self.game_levels(defaults)?;
        if !levels.iter().any(|level| level.id == level_id) {
            return Err(CoreError::LevelNotFound(level_id.to_string()));
        }
        let next_id = level_id
            .parse::<u64>()
            .ok()
            .map(|id| (id + 1).to_string());
        for level in levels.iter_mut() {
            if level.id == level_id {
                level.completed = true;
            } else if next_id.as_deref() == Some(level.id.as_str()) {
                level.locked = false;
            }
        }
        write_json(self.store.as_ref(), GAME_PROGRESS_KEY, &levels)?;
        info!(level_id, "level completed");
        Ok(levels)
    }
}

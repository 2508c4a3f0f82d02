//! k1-content
//!
//! Read-only learning material compiled into the binary: quizzes, Schedule
//! K-1 box explanations, partnership tax cases, and game levels with their
//! scenarios. Tables are parsed and validated once on first access.

use std::collections::HashSet;

use k1_domain::{serde::de::DeserializeOwned, GameScenario, K1Box, Keyed, Level, Quiz, TaxCase};
use once_cell::sync::Lazy;
use serde_json::from_str;
use thiserror::Error;
use tracing::debug;

const QUIZZES_JSON: &str = include_str!("../data/quizzes.json");
const K1_BOXES_JSON: &str = include_str!("../data/k1_boxes.json");
const TAX_CASES_JSON: &str = include_str!("../data/tax_cases.json");
const GAME_LEVELS_JSON: &str = include_str!("../data/game_levels.json");
const GAME_SCENARIOS_JSON: &str = include_str!("../data/game_scenarios.json");

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("content table `{table}` could not be parsed: {reason}")]
    Parse { table: &'static str, reason: String },
    #[error("content table `{table}` is inconsistent: {reason}")]
    Invalid { table: &'static str, reason: String },
}

static BUNDLED: Lazy<Result<Catalogue, ContentError>> = Lazy::new(|| {
    Catalogue::from_json(
        QUIZZES_JSON,
        K1_BOXES_JSON,
        TAX_CASES_JSON,
        GAME_LEVELS_JSON,
        GAME_SCENARIOS_JSON,
    )
});

/// All static content tables.
#[derive(Debug, Clone)]
pub struct Catalogue {
    quizzes: Vec<Quiz>,
    boxes: Vec<K1Box>,
    cases: Vec<TaxCase>,
    levels: Vec<Level>,
    scenarios: Vec<GameScenario>,
}

impl Catalogue {
    /// The catalogue bundled with the crate.
    pub fn bundled() -> Result<&'static Catalogue, ContentError> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    pub fn from_json(
        quizzes: &str,
        boxes: &str,
        cases: &str,
        levels: &str,
        scenarios: &str,
    ) -> Result<Self, ContentError> {
        let catalogue = Self {
            quizzes: parse("quizzes", quizzes)?,
            boxes: parse("k1_boxes", boxes)?,
            cases: parse("tax_cases", cases)?,
            levels: parse("game_levels", levels)?,
            scenarios: parse("game_scenarios", scenarios)?,
        };
        catalogue.validate()?;
        debug!(
            quizzes = catalogue.quizzes.len(),
            boxes = catalogue.boxes.len(),
            cases = catalogue.cases.len(),
            levels = catalogue.levels.len(),
            "content catalogue loaded"
        );
        Ok(catalogue)
    }

    fn validate(&self) -> Result<(), ContentError> {
        unique_ids("quizzes", &self.quizzes)?;
        unique_ids("k1_boxes", &self.boxes)?;
        unique_ids("tax_cases", &self.cases)?;
        unique_ids("game_levels", &self.levels)?;
        unique_ids("game_scenarios", &self.scenarios)?;

        for quiz in &self.quizzes {
            if quiz.questions.is_empty() {
                return Err(invalid("quizzes", format!("quiz `{}` has no questions", quiz.id)));
            }
            for question in &quiz.questions {
                if question.correct_option >= question.options.len() {
                    return Err(invalid(
                        "quizzes",
                        format!("question `{}` points past its options", question.id),
                    ));
                }
            }
        }
        for k1_box in &self.boxes {
            if let Some(missing) = k1_box
                .related_boxes
                .iter()
                .find(|related| self.k1_box(related).is_none())
            {
                return Err(invalid(
                    "k1_boxes",
                    format!("`{}` relates to unknown box `{missing}`", k1_box.id),
                ));
            }
        }
        for scenario in &self.scenarios {
            if scenario.questions.iter().any(|question| question.fields.is_empty()) {
                return Err(invalid(
                    "game_scenarios",
                    format!("scenario `{}` has a question without fields", scenario.id),
                ));
            }
        }
        Ok(())
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn quiz(&self, id: &str) -> Option<&Quiz> {
        find(&self.quizzes, id)
    }

    pub fn k1_boxes(&self) -> &[K1Box] {
        &self.boxes
    }

    pub fn k1_box(&self, id: &str) -> Option<&K1Box> {
        find(&self.boxes, id)
    }

    pub fn related_boxes(&self, k1_box: &K1Box) -> Vec<&K1Box> {
        k1_box
            .related_boxes
            .iter()
            .filter_map(|id| self.k1_box(id))
            .collect()
    }

    pub fn tax_cases(&self) -> &[TaxCase] {
        &self.cases
    }

    pub fn tax_case(&self, id: &str) -> Option<&TaxCase> {
        find(&self.cases, id)
    }

    /// Default game levels in play order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        find(&self.levels, id)
    }

    /// Scenario for a level; levels without written content get a placeholder.
    pub fn scenario_for(&self, level_id: &str) -> GameScenario {
        find(&self.scenarios, level_id)
            .cloned()
            .unwrap_or_else(|| GameScenario::placeholder(level_id))
    }

    /// Case-insensitive substring match on box title or description.
    /// An empty query matches every box.
    pub fn search_boxes(&self, query: &str) -> Vec<&K1Box> {
        let needle = query.to_lowercase();
        self.boxes
            .iter()
            .filter(|k1_box| {
                k1_box.title.to_lowercase().contains(&needle)
                    || k1_box.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Case-insensitive substring match on case title or summary.
    pub fn search_cases(&self, query: &str) -> Vec<&TaxCase> {
        let needle = query.to_lowercase();
        self.cases
            .iter()
            .filter(|case| {
                case.title.to_lowercase().contains(&needle)
                    || case.summary.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn parse<T: DeserializeOwned>(table: &'static str, raw: &str) -> Result<T, ContentError> {
    from_str(raw).map_err(|err| ContentError::Parse {
        table,
        reason: err.to_string(),
    })
}

fn invalid(table: &'static str, reason: String) -> ContentError {
    ContentError::Invalid { table, reason }
}

fn find<'a, T: Keyed>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.key() == id)
}

fn unique_ids<T: Keyed>(table: &'static str, items: &[T]) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(invalid(table, format!("duplicate id `{}`", item.key())));
        }
    }
    Ok(())
}

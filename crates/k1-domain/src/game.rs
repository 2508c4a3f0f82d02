//! Game levels, scenario questions with numeric fill-in fields, and level progress.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Static level definition from the content catalogue.
pub struct Level {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
}

impl Keyed for Level {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Persisted level record tracking completion and lock state.
pub struct LevelProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub locked: bool,
}

impl LevelProgress {
    pub fn from_level(level: &Level, locked: bool) -> Self {
        Self {
            id: level.id.clone(),
            title: level.title.clone(),
            description: level.description.clone(),
            difficulty: level.difficulty,
            completed: false,
            locked,
        }
    }
}

impl Keyed for LevelProgress {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Displayable for LevelProgress {
    fn display_label(&self) -> String {
        let state = if self.locked {
            "locked"
        } else if self.completed {
            "completed"
        } else {
            "open"
        };
        format!("{}. {} [{}] ({})", self.id, self.title, self.difficulty, state)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A fill-in answer box with its fixed expected text.
pub struct InputField {
    pub id: String,
    pub label: String,
    pub expected: String,
}

impl InputField {
    /// Exact comparison after trimming the submitted text.
    pub fn accepts(&self, submitted: &str) -> bool {
        submitted.trim() == self.expected
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameQuestion {
    pub id: String,
    pub prompt: String,
    pub explanation: String,
    pub fields: Vec<InputField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<GameQuestion>,
}

impl Keyed for GameScenario {
    fn key(&self) -> &str {
        &self.id
    }
}

impl GameScenario {
    /// Scenario served for levels whose content has not been written yet.
    pub fn placeholder(level_id: &str) -> Self {
        Self {
            id: level_id.to_string(),
            title: "Coming Soon".into(),
            description: "This level is under development. Please check back later!".into(),
            questions: vec![GameQuestion {
                id: format!("{level_id}-1"),
                prompt: "This is a placeholder question. What is 2 + 2?".into(),
                explanation: "The answer is 4, which is the sum of 2 and 2.".into(),
                fields: vec![InputField {
                    id: "placeholder".into(),
                    label: "Answer".into(),
                    expected: "4".into(),
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_field_requires_exact_trimmed_text() {
        let field = InputField {
            id: "alex-income".into(),
            label: "Alex".into(),
            expected: "40000".into(),
        };
        assert!(field.accepts("40000"));
        assert!(field.accepts("  40000\n"));
        assert!(!field.accepts("40,000"));
        assert!(!field.accepts("40000.0"));
        assert!(!field.accepts(""));
    }

    #[test]
    fn level_progress_reads_stored_layout() {
        let raw = r#"[{"id":"1","title":"Partnership Basics","description":"d","difficulty":"Beginner","completed":true,"locked":false}]"#;
        let levels: Vec<LevelProgress> = serde_json::from_str(raw).unwrap();
        assert!(levels[0].completed);
        assert_eq!(levels[0].difficulty, Difficulty::Beginner);
    }

    #[test]
    fn placeholder_scenario_has_one_question() {
        let scenario = GameScenario::placeholder("4");
        assert_eq!(scenario.questions.len(), 1);
        assert_eq!(scenario.questions[0].id, "4-1");
    }
}

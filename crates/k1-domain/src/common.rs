//! Shared traits and enums used across the learning content and worksheet models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exposes the string identifier content tables and persisted records are keyed by.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Provides read-only access to an entity's display title.
pub trait Titled {
    fn title(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Supplies a signed contribution to a running total.
pub trait SignedAmount {
    fn signed_amount(&self) -> Decimal;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Difficulty tier shared by quizzes and game levels.
pub enum Difficulty {
    #[default]
    #[serde(rename = "Beginner", alias = "beginner")]
    Beginner,
    #[serde(rename = "Intermediate", alias = "intermediate")]
    Intermediate,
    #[serde(rename = "Advanced", alias = "advanced")]
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal::{self, Decimal};
pub use serde;
pub use uuid;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_accepts_both_casings() {
        let upper: Difficulty = serde_json::from_str("\"Advanced\"").unwrap();
        let lower: Difficulty = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(upper, Difficulty::Advanced);
        assert_eq!(lower, Difficulty::Advanced);
        assert_eq!(
            serde_json::to_string(&Difficulty::Intermediate).unwrap(),
            "\"Intermediate\""
        );
    }
}

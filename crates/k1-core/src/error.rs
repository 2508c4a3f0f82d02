use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Stored record `{key}` is corrupted: {reason}")]
    CorruptRecord { key: String, reason: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Worksheet not found: {0}")]
    SnapshotNotFound(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
    #[error("Quiz not found: {0}")]
    QuizNotFound(String),
    #[error("Level not found: {0}")]
    LevelNotFound(String),
    #[error("Level {0} is locked. Complete the previous level to unlock it")]
    LevelLocked(String),
    #[error("This question has already been answered")]
    QuestionLocked,
    #[error("Answer the current question before moving on")]
    QuestionUnanswered,
    #[error("Session already completed")]
    SessionCompleted,
}

impl CoreError {
    /// True for outcomes the user should see as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::SnapshotNotFound(_)
                | CoreError::EntryNotFound(_)
                | CoreError::QuizNotFound(_)
                | CoreError::LevelNotFound(_)
        )
    }

    /// True when the backing store failed, as opposed to a user mistake.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Storage(_) | CoreError::Io(_) | CoreError::Serde(_)
        )
    }
}

//! Error types for content lookup and loading

use thiserror::Error;

/// Errors that can occur when loading or addressing exercise content
#[derive(Debug, Error)]
pub enum DojoError {
    /// No classroom with the given id
    #[error("Classroom not found: {0}")]
    ClassroomNotFound(String),

    /// No exercise with the given id in the classroom
    #[error("Exercise not found: {exercise} (classroom {classroom})")]
    ExerciseNotFound {
        /// Classroom that was searched
        classroom: String,
        /// Exercise id that did not resolve
        exercise: String,
    },

    /// Content parsed but breaks an invariant (duplicate ids and the like)
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Failed to read a content file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Content file is not valid JSON for the model
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DojoError {
    /// Whether this error only means an id did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(self, DojoError::ClassroomNotFound(_) | DojoError::ExerciseNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_are_flagged() {
        assert!(DojoError::ClassroomNotFound("x".into()).is_not_found());
        assert!(
            DojoError::ExerciseNotFound { classroom: "c".into(), exercise: "e".into() }
                .is_not_found()
        );
        assert!(!DojoError::InvalidContent("dup".into()).is_not_found());
    }

    #[test]
    fn exercise_not_found_message_names_both_ids() {
        let err = DojoError::ExerciseNotFound { classroom: "web".into(), exercise: "ex-9".into() };
        let msg = err.to_string();
        assert!(msg.contains("ex-9"));
        assert!(msg.contains("web"));
    }
}

//! Grading error taxonomy.
//!
//! Defined in `korrektur-core` so the batch orchestrator can classify
//! errors without string matching: construction-time errors abort the
//! whole batch, submission-scoped errors are isolated and reported
//! alongside successful results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while grading.
#[derive(Debug, Error)]
pub enum GradingError {
    /// The rubric violates a construction invariant. Fatal to the batch.
    #[error("invalid rubric: {0}")]
    InvalidRubric(String),

    /// The normalized solution contains structure the engine cannot
    /// interpret. Scoped to one submission.
    #[error("extraction mismatch for submission '{submission_id}': {detail}")]
    ExtractionMismatch {
        submission_id: String,
        detail: String,
    },

    /// The rubric's max_points is 0, so a percentage is undefined.
    #[error("grade percentage undefined: max_points is 0")]
    DivisionUndefined,

    /// The feedback lookup table has no text for an error tag.
    #[error("no feedback text configured for error tag '{0}'")]
    UnknownErrorTag(String),

    /// Scoring one submission exceeded the configured deadline.
    #[error("submission '{submission_id}' timed out after {timeout_ms}ms")]
    Timeout {
        submission_id: String,
        timeout_ms: u64,
    },

    /// The grade threshold table is malformed.
    #[error("invalid grade scale: {0}")]
    InvalidGradeScale(String),

    /// The feedback message configuration is incomplete.
    #[error("invalid feedback config: {0}")]
    InvalidFeedbackConfig(String),
}

impl GradingError {
    /// Returns `true` if this error affects only a single submission and
    /// must not abort its siblings.
    pub fn is_submission_scoped(&self) -> bool {
        matches!(
            self,
            GradingError::ExtractionMismatch { .. }
                | GradingError::UnknownErrorTag(_)
                | GradingError::Timeout { .. }
        )
    }
}

/// Classification of a per-submission failure, as surfaced in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    ExtractionMismatch,
    UnknownErrorTag,
    Timeout,
    /// The batch was cancelled before or during this submission.
    Cancelled,
    /// Unexpected internal failure (e.g. a panicked worker).
    Internal,
}

/// A per-submission failure record. Never dropped: every failed
/// submission appears in the batch report with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl GradeFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "batch cancelled")
    }

    /// Classify a grading error into a report failure.
    pub fn from_error(err: &GradingError) -> Self {
        let kind = match err {
            GradingError::ExtractionMismatch { .. } => FailureKind::ExtractionMismatch,
            GradingError::UnknownErrorTag(_) => FailureKind::UnknownErrorTag,
            GradingError::Timeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Internal,
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_scoped_classification() {
        assert!(GradingError::ExtractionMismatch {
            submission_id: "s1".into(),
            detail: "empty step".into(),
        }
        .is_submission_scoped());
        assert!(GradingError::Timeout {
            submission_id: "s1".into(),
            timeout_ms: 100,
        }
        .is_submission_scoped());
        assert!(!GradingError::InvalidRubric("dup".into()).is_submission_scoped());
        assert!(!GradingError::DivisionUndefined.is_submission_scoped());
    }

    #[test]
    fn failure_from_error_maps_kind() {
        let err = GradingError::UnknownErrorTag("sign-error".into());
        let failure = GradeFailure::from_error(&err);
        assert_eq!(failure.kind, FailureKind::UnknownErrorTag);
        assert!(failure.message.contains("sign-error"));

        let err = GradingError::InvalidGradeScale("gap".into());
        assert_eq!(GradeFailure::from_error(&err).kind, FailureKind::Internal);
    }
}

//! Error detectors.
//!
//! Each detector inspects a solution independently and emits at most one
//! tag from the fixed taxonomy. The engine unions detector output into
//! the deduplicated `detected_errors` set; order between detectors does
//! not matter.
//!
//! `arithmetic-error` and `wrong-formula` have no built-in detector:
//! deciding that a formula was misapplied needs assignment knowledge the
//! core does not carry. Custom implementations can emit them.

use std::sync::Arc;

use crate::matchers::extract_numbers;
use crate::model::{ErrorTag, NormalizedSolution, Rubric};

/// Detects one class of mistake in a solution.
///
/// Implementations must be deterministic and side-effect-free, and
/// return at most one tag per run.
pub trait ErrorDetector: Send + Sync {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    fn detect(&self, rubric: &Rubric, solution: &NormalizedSolution) -> Option<ErrorTag>;
}

/// The built-in detector set.
pub fn default_detectors() -> Vec<Arc<dyn ErrorDetector>> {
    vec![
        Arc::new(SignErrorDetector),
        Arc::new(MissingUnitDetector),
        Arc::new(RoundingErrorDetector),
        Arc::new(IncompleteAnswerDetector),
    ]
}

/// Flags a value that flips sign between consecutive steps while keeping
/// its magnitude: the classic transposition mistake.
pub struct SignErrorDetector;

impl ErrorDetector for SignErrorDetector {
    fn name(&self) -> &'static str {
        "sign-error"
    }

    fn detect(&self, _rubric: &Rubric, solution: &NormalizedSolution) -> Option<ErrorTag> {
        const EPS: f64 = 1e-9;

        for window in solution.steps.windows(2) {
            let prev = extract_numbers(&window[0].payload);
            let next = extract_numbers(&window[1].payload);
            for a in &prev {
                if a.abs() < EPS {
                    continue;
                }
                if next.iter().any(|b| (a + b).abs() < EPS) {
                    return Some(ErrorTag::SignError);
                }
            }
        }
        None
    }
}

/// Flags a final step that lacks the unit the rubric expects.
pub struct MissingUnitDetector;

impl ErrorDetector for MissingUnitDetector {
    fn name(&self) -> &'static str {
        "missing-unit"
    }

    fn detect(&self, rubric: &Rubric, solution: &NormalizedSolution) -> Option<ErrorTag> {
        let unit = rubric.expected_unit()?;
        let last = solution.steps.last()?;
        if last.payload.to_lowercase().contains(&unit.to_lowercase()) {
            None
        } else {
            Some(ErrorTag::MissingUnit)
        }
    }
}

/// Flags a final answer that is close to the expected value but not
/// equal to it: right approach, sloppy rounding.
pub struct RoundingErrorDetector;

/// Answers within this relative window of the expected value count as exact.
const EXACT_REL_TOLERANCE: f64 = 1e-6;
/// Answers within this relative window (but outside the exact one) are
/// treated as rounding mistakes rather than wrong answers.
const ROUNDING_REL_TOLERANCE: f64 = 0.01;

impl ErrorDetector for RoundingErrorDetector {
    fn name(&self) -> &'static str {
        "rounding-error"
    }

    fn detect(&self, rubric: &Rubric, solution: &NormalizedSolution) -> Option<ErrorTag> {
        let expected = rubric.expected_answer()?;
        let last = solution.steps.last()?;
        let scale = expected.abs().max(1.0);

        let nearest = extract_numbers(&last.payload)
            .into_iter()
            .min_by(|a, b| {
                (a - expected)
                    .abs()
                    .total_cmp(&(b - expected).abs())
            })?;

        let diff = (nearest - expected).abs();
        if diff > EXACT_REL_TOLERANCE * scale && diff <= ROUNDING_REL_TOLERANCE * scale {
            Some(ErrorTag::RoundingError)
        } else {
            None
        }
    }
}

/// Flags a solution whose final step carries no numeric result at all.
pub struct IncompleteAnswerDetector;

impl ErrorDetector for IncompleteAnswerDetector {
    fn name(&self) -> &'static str {
        "incomplete-answer"
    }

    fn detect(&self, _rubric: &Rubric, solution: &NormalizedSolution) -> Option<ErrorTag> {
        let last = solution.steps.last()?;
        if extract_numbers(&last.payload).is_empty() {
            Some(ErrorTag::IncompleteAnswer)
        } else {
            None
        }
    }
}

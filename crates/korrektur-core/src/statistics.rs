//! Aggregate statistics over one batch.
//!
//! Averages and bests are computed over graded submissions only, while
//! the failed count stays visible next to them: a batch with failures
//! never masquerades as a clean run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::SubmissionOutcome;

/// Summary figures for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Submissions graded successfully.
    pub graded: usize,
    /// Submissions that failed (extraction, timeout, cancellation, ...).
    pub failed: usize,
    /// Mean awarded points over graded submissions.
    pub average_points: Option<f64>,
    /// Highest awarded points over graded submissions.
    pub best_points: Option<u32>,
    /// How many graded submissions landed in each band, keyed by the
    /// band symbol.
    pub band_distribution: BTreeMap<String, usize>,
}

/// Compute statistics from a batch's outcomes.
pub fn compute_batch_stats(outcomes: &BTreeMap<String, SubmissionOutcome>) -> BatchStats {
    let mut graded = 0usize;
    let mut failed = 0usize;
    let mut point_sum = 0u64;
    let mut best_points = None;
    let mut band_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for outcome in outcomes.values() {
        match outcome {
            SubmissionOutcome::Graded { scoring, band, .. } => {
                graded += 1;
                point_sum += u64::from(scoring.total_points);
                best_points = Some(
                    best_points
                        .map_or(scoring.total_points, |b: u32| b.max(scoring.total_points)),
                );
                *band_distribution.entry(band.to_string()).or_default() += 1;
            }
            SubmissionOutcome::Failed { .. } => failed += 1,
        }
    }

    let average_points = if graded > 0 {
        Some(point_sum as f64 / graded as f64)
    } else {
        None
    };

    BatchStats {
        graded,
        failed,
        average_points,
        best_points,
        band_distribution,
    }
}

//! Grade mapping.
//!
//! Converts a points/max_points ratio into a discrete grade band via a
//! threshold table. The table is configuration, not a constant: grading
//! scales vary per course and institution, so callers can load their own
//! [`GradeScale`] while the default carries the standard German table.

use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::GradeBand;

/// One row of the threshold table: `band` applies at or above `min_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeStep {
    pub min_percent: f64,
    pub band: GradeBand,
}

/// A validated, total-ordered grade threshold table.
///
/// Steps are evaluated top-down and the first match wins; anything below
/// the last threshold maps to the fallback band, so the table is closed
/// with no gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGradeScale")]
pub struct GradeScale {
    steps: Vec<GradeStep>,
    fallback: GradeBand,
}

#[derive(Debug, Deserialize)]
struct RawGradeScale {
    steps: Vec<GradeStep>,
    fallback: GradeBand,
}

impl TryFrom<RawGradeScale> for GradeScale {
    type Error = GradingError;

    fn try_from(raw: RawGradeScale) -> Result<Self, Self::Error> {
        GradeScale::new(raw.steps, raw.fallback)
    }
}

impl GradeScale {
    /// Build a validated scale. Thresholds must be strictly descending
    /// and within `(0, 100]`.
    pub fn new(steps: Vec<GradeStep>, fallback: GradeBand) -> Result<Self, GradingError> {
        if steps.is_empty() {
            return Err(GradingError::InvalidGradeScale(
                "threshold table is empty".into(),
            ));
        }
        for step in &steps {
            if !(step.min_percent > 0.0 && step.min_percent <= 100.0) {
                return Err(GradingError::InvalidGradeScale(format!(
                    "threshold {} is outside (0, 100]",
                    step.min_percent
                )));
            }
        }
        for pair in steps.windows(2) {
            if pair[1].min_percent >= pair[0].min_percent {
                return Err(GradingError::InvalidGradeScale(format!(
                    "thresholds must be strictly descending, got {} then {}",
                    pair[0].min_percent, pair[1].min_percent
                )));
            }
        }
        Ok(Self { steps, fallback })
    }

    pub fn steps(&self) -> &[GradeStep] {
        &self.steps
    }

    pub fn fallback(&self) -> GradeBand {
        self.fallback
    }

    /// First threshold met top-down wins.
    fn band_for(&self, percentage: f64) -> GradeBand {
        for step in &self.steps {
            if percentage >= step.min_percent {
                return step.band;
            }
        }
        self.fallback
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        // 95/85/75/65/50/35 with fallback 6; validated by construction.
        Self {
            steps: vec![
                GradeStep { min_percent: 95.0, band: GradeBand::OnePlus },
                GradeStep { min_percent: 85.0, band: GradeBand::One },
                GradeStep { min_percent: 75.0, band: GradeBand::Two },
                GradeStep { min_percent: 65.0, band: GradeBand::Three },
                GradeStep { min_percent: 50.0, band: GradeBand::Four },
                GradeStep { min_percent: 35.0, band: GradeBand::Five },
            ],
            fallback: GradeBand::Six,
        }
    }
}

/// Map awarded points to a grade band.
///
/// Fails with [`GradingError::DivisionUndefined`] when `max_points` is 0;
/// callers must validate rubrics before grading rather than treating
/// this as 0%.
pub fn map_grade(
    total_points: u32,
    max_points: u32,
    scale: &GradeScale,
) -> Result<GradeBand, GradingError> {
    if max_points == 0 {
        return Err(GradingError::DivisionUndefined);
    }
    let percentage = f64::from(total_points) / f64::from(max_points) * 100.0;
    Ok(scale.band_for(percentage))
}

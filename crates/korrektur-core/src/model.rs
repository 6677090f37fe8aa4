//! Core data model types for korrektur.
//!
//! These are the fundamental types the grading pipeline operates on:
//! rubrics, normalized student solutions, scoring outcomes, error tags,
//! and grade bands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::GradingError;

/// The data-driven rule a criterion is checked against.
///
/// Rules are deliberately declarative so they can live in rubric TOML
/// files; the `RuleMatcher` interprets them at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CriterionCheck {
    /// Satisfied if any step contains one of the keywords (case-insensitive).
    Keyword { any_of: Vec<String> },
    /// Satisfied if any step contains a number within `tolerance` of `expected`.
    Numeric { expected: f64, tolerance: f64 },
    /// Satisfied if the final step mentions the unit (case-insensitive).
    Unit { unit: String },
    /// Satisfied if the final step carries a number within `tolerance` of `expected`.
    FinalAnswer { expected: f64, tolerance: f64 },
}

/// One scorable rubric line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    /// Unique identifier within the rubric.
    pub id: String,
    /// Human-readable description of what is being scored.
    pub description: String,
    /// Points awarded when the criterion is satisfied.
    pub points: u32,
    /// Required criteria register an error tag when unsatisfied.
    pub required: bool,
    /// The rule used to decide satisfaction.
    pub check: CriterionCheck,
}

/// The scoring rule set for one assignment.
///
/// A rubric is only obtainable through [`Rubric::new`], which enforces
/// the construction invariants; afterwards it is immutable for the
/// lifetime of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct Rubric {
    id: String,
    title: String,
    max_points: u32,
    criteria: Vec<Criterion>,
    expected_answer: Option<f64>,
    expected_unit: Option<String>,
}

impl Rubric {
    /// Build a validated rubric.
    ///
    /// Fails with [`GradingError::InvalidRubric`] when a criterion id is
    /// duplicated or the required criteria's points alone exceed
    /// `max_points`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        max_points: u32,
        criteria: Vec<Criterion>,
        expected_answer: Option<f64>,
        expected_unit: Option<String>,
    ) -> Result<Self, GradingError> {
        let mut seen = BTreeSet::new();
        for c in &criteria {
            if !seen.insert(c.id.as_str()) {
                return Err(GradingError::InvalidRubric(format!(
                    "duplicate criterion id '{}'",
                    c.id
                )));
            }
        }

        let required_points: u64 = criteria
            .iter()
            .filter(|c| c.required)
            .map(|c| u64::from(c.points))
            .sum();
        if required_points > u64::from(max_points) {
            return Err(GradingError::InvalidRubric(format!(
                "required criteria total {} points but max_points is {}",
                required_points, max_points
            )));
        }

        Ok(Self {
            id: id.into(),
            title: title.into(),
            max_points,
            criteria,
            expected_answer,
            expected_unit,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Expected final answer, if the assignment has a single numeric result.
    pub fn expected_answer(&self) -> Option<f64> {
        self.expected_answer
    }

    /// Unit the final answer is expected to carry (e.g. "cm²").
    pub fn expected_unit(&self) -> Option<&str> {
        self.expected_unit.as_deref()
    }
}

/// One step of a parsed student solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionStep {
    /// Position of the step within the solution.
    pub index: usize,
    /// Free-text or symbolic payload, as produced by the extraction adapter.
    pub payload: String,
}

/// Structured representation of one student submission, independent of
/// the original file format. Produced upstream; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedSolution {
    /// Unique identifier of the submission.
    pub submission_id: String,
    /// Student name, when the extraction adapter could determine it.
    #[serde(default)]
    pub student: Option<String>,
    /// Ordered solution steps.
    pub steps: Vec<SolutionStep>,
}

/// Outcome of evaluating one criterion against one solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionOutcome {
    pub criterion_id: String,
    pub satisfied: bool,
    /// Full criterion points when satisfied, otherwise 0.
    pub points_awarded: u32,
}

/// Result of scoring one solution against one rubric.
///
/// Created fresh per run and never mutated afterwards; the engine holds
/// no reference once it returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub submission_id: String,
    pub rubric_id: String,
    /// Sum of awarded points, clamped to `[0, max_points]`.
    pub total_points: u32,
    /// One outcome per criterion, in rubric order.
    pub per_criterion: Vec<CriterionOutcome>,
    /// Deduplicated error tags in deterministic order.
    pub detected_errors: BTreeSet<ErrorTag>,
}

/// A label from the fixed mistake taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorTag {
    SignError,
    MissingUnit,
    ArithmeticError,
    WrongFormula,
    RoundingError,
    IncompleteAnswer,
    /// A required criterion was not satisfied.
    MissingRequired(String),
}

impl ErrorTag {
    /// Stable key used to look up feedback text for this tag.
    pub fn lookup_key(&self) -> &'static str {
        match self {
            ErrorTag::SignError => "sign-error",
            ErrorTag::MissingUnit => "missing-unit",
            ErrorTag::ArithmeticError => "arithmetic-error",
            ErrorTag::WrongFormula => "wrong-formula",
            ErrorTag::RoundingError => "rounding-error",
            ErrorTag::IncompleteAnswer => "incomplete-answer",
            ErrorTag::MissingRequired(_) => "missing-required",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorTag::MissingRequired(id) => write!(f, "missing-required:{id}"),
            other => f.write_str(other.lookup_key()),
        }
    }
}

impl FromStr for ErrorTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix("missing-required:") {
            if id.is_empty() {
                return Err("missing-required tag without criterion id".into());
            }
            return Ok(ErrorTag::MissingRequired(id.to_string()));
        }
        match s {
            "sign-error" => Ok(ErrorTag::SignError),
            "missing-unit" => Ok(ErrorTag::MissingUnit),
            "arithmetic-error" => Ok(ErrorTag::ArithmeticError),
            "wrong-formula" => Ok(ErrorTag::WrongFormula),
            "rounding-error" => Ok(ErrorTag::RoundingError),
            "incomplete-answer" => Ok(ErrorTag::IncompleteAnswer),
            other => Err(format!("unknown error tag: {other}")),
        }
    }
}

impl Serialize for ErrorTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ErrorTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Discrete grade symbol of the German school scale, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradeBand {
    OnePlus,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl GradeBand {
    /// All bands, best first.
    pub const ALL: [GradeBand; 7] = [
        GradeBand::OnePlus,
        GradeBand::One,
        GradeBand::Two,
        GradeBand::Three,
        GradeBand::Four,
        GradeBand::Five,
        GradeBand::Six,
    ];

    /// Ordinal rank; lower is better.
    pub fn rank(self) -> u8 {
        match self {
            GradeBand::OnePlus => 0,
            GradeBand::One => 1,
            GradeBand::Two => 2,
            GradeBand::Three => 3,
            GradeBand::Four => 4,
            GradeBand::Five => 5,
            GradeBand::Six => 6,
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GradeBand::OnePlus => "1+",
            GradeBand::One => "1",
            GradeBand::Two => "2",
            GradeBand::Three => "3",
            GradeBand::Four => "4",
            GradeBand::Five => "5",
            GradeBand::Six => "6",
        };
        f.write_str(s)
    }
}

impl FromStr for GradeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1+" => Ok(GradeBand::OnePlus),
            "1" => Ok(GradeBand::One),
            "2" => Ok(GradeBand::Two),
            "3" => Ok(GradeBand::Three),
            "4" => Ok(GradeBand::Four),
            "5" => Ok(GradeBand::Five),
            "6" => Ok(GradeBand::Six),
            other => Err(format!("unknown grade band: {other}")),
        }
    }
}

impl Serialize for GradeBand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GradeBand {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! TOML rubric and solution file parsing.
//!
//! Rubric authoring happens in TOML; parsing funnels everything through
//! the validating [`Rubric::new`] constructor, so a file can never
//! produce a rubric that violates the construction invariants. Negative
//! point values are caught here, before the unsigned model type.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::GradingError;
use crate::model::{Criterion, CriterionCheck, NormalizedSolution, Rubric, SolutionStep};

/// Intermediate TOML structure for rubric files.
#[derive(Debug, Deserialize)]
struct TomlRubricFile {
    rubric: TomlRubricHeader,
    #[serde(default)]
    criteria: Vec<TomlCriterion>,
}

#[derive(Debug, Deserialize)]
struct TomlRubricHeader {
    id: String,
    title: String,
    max_points: i64,
    #[serde(default)]
    expected_answer: Option<f64>,
    #[serde(default)]
    expected_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlCriterion {
    id: String,
    #[serde(default)]
    description: String,
    points: i64,
    #[serde(default = "default_true")]
    required: bool,
    check: CriterionCheck,
}

fn default_true() -> bool {
    true
}

/// Intermediate TOML structure for solution files.
#[derive(Debug, Deserialize)]
struct TomlSolutionsFile {
    #[serde(default)]
    solutions: Vec<TomlSolution>,
}

#[derive(Debug, Deserialize)]
struct TomlSolution {
    submission_id: String,
    #[serde(default)]
    student: Option<String>,
    steps: Vec<String>,
}

/// Parse a rubric TOML file.
pub fn parse_rubric(path: &Path) -> Result<Rubric> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rubric file: {}", path.display()))?;
    parse_rubric_str(&content, path)
}

/// Parse a rubric from a TOML string (useful for testing).
pub fn parse_rubric_str(content: &str, source_path: &Path) -> Result<Rubric> {
    let parsed: TomlRubricFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let max_points = to_points(parsed.rubric.max_points, "max_points")?;

    let criteria = parsed
        .criteria
        .into_iter()
        .map(|c| {
            let points = to_points(c.points, &format!("criterion '{}'", c.id))?;
            Ok(Criterion {
                id: c.id,
                description: c.description,
                points,
                required: c.required,
                check: c.check,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let rubric = Rubric::new(
        parsed.rubric.id,
        parsed.rubric.title,
        max_points,
        criteria,
        parsed.rubric.expected_answer,
        parsed.rubric.expected_unit,
    )?;
    Ok(rubric)
}

fn to_points(value: i64, what: &str) -> Result<u32> {
    if value < 0 {
        return Err(GradingError::InvalidRubric(format!(
            "{what} has negative points ({value})"
        ))
        .into());
    }
    u32::try_from(value).with_context(|| format!("{what} points out of range"))
}

/// Parse a solutions TOML file.
pub fn parse_solutions(path: &Path) -> Result<Vec<NormalizedSolution>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read solutions file: {}", path.display()))?;
    parse_solutions_str(&content, path)
}

/// Parse solutions from a TOML string.
pub fn parse_solutions_str(content: &str, source_path: &Path) -> Result<Vec<NormalizedSolution>> {
    let parsed: TomlSolutionsFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(parsed
        .solutions
        .into_iter()
        .map(|s| NormalizedSolution {
            submission_id: s.submission_id,
            student: s.student,
            steps: s
                .steps
                .into_iter()
                .enumerate()
                .map(|(index, payload)| SolutionStep { index, payload })
                .collect(),
        })
        .collect())
}

/// Recursively load all `.toml` solution files from a directory.
pub fn load_solutions_directory(dir: &Path) -> Result<Vec<NormalizedSolution>> {
    let mut solutions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            solutions.extend(load_solutions_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_solutions(&path) {
                Ok(batch) => solutions.extend(batch),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(solutions)
}

/// A non-fatal finding from rubric linting.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The criterion id (if applicable).
    pub criterion_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Lint a validated rubric for issues that are legal but probably
/// unintended.
pub fn lint_rubric(rubric: &Rubric) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for criterion in rubric.criteria() {
        if criterion.description.trim().is_empty() {
            warnings.push(ValidationWarning {
                criterion_id: Some(criterion.id.clone()),
                message: "description is empty".into(),
            });
        }
        if criterion.points == 0 {
            warnings.push(ValidationWarning {
                criterion_id: Some(criterion.id.clone()),
                message: "criterion awards 0 points".into(),
            });
        }
    }

    let total_points: u64 = rubric.criteria().iter().map(|c| u64::from(c.points)).sum();
    if total_points < u64::from(rubric.max_points()) {
        warnings.push(ValidationWarning {
            criterion_id: None,
            message: format!(
                "criteria award at most {} points, so full marks ({}) are unreachable",
                total_points,
                rubric.max_points()
            ),
        });
    }

    if rubric.expected_answer().is_some()
        && !rubric
            .criteria()
            .iter()
            .any(|c| matches!(c.check, CriterionCheck::FinalAnswer { .. }))
    {
        warnings.push(ValidationWarning {
            criterion_id: None,
            message: "expected_answer is set but no criterion checks the final answer".into(),
        });
    }

    warnings
}

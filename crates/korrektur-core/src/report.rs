//! Batch report types with JSON persistence.
//!
//! A report is the caller-owned record of one grading run: every
//! submission appears exactly once, either graded or with its failure
//! reason. Counts are always explicit; failures are never folded into a
//! success rate.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GradeFailure;
use crate::model::{GradeBand, ScoringResult};
use crate::statistics::BatchStats;

/// The per-submission entry of a batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SubmissionOutcome {
    Graded {
        scoring: ScoringResult,
        band: GradeBand,
        feedback: String,
    },
    Failed {
        failure: GradeFailure,
    },
}

/// Rubric header carried in the report (without the full criteria).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSummary {
    pub id: String,
    pub title: String,
    pub max_points: u32,
    pub criterion_count: usize,
}

/// A complete grading run over one rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Summary of the rubric that was graded against.
    pub rubric: RubricSummary,
    /// One outcome per submission, keyed by submission id.
    pub outcomes: BTreeMap<String, SubmissionOutcome>,
    /// Aggregate statistics.
    pub stats: BatchStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

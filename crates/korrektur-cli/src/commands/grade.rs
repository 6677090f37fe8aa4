//! The `korrektur grade` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use korrektur_core::engine::{BatchConfig, BatchObserver, GradeEngine};
use korrektur_core::error::GradeFailure;
use korrektur_core::model::GradeBand;
use korrektur_core::parser;
use korrektur_core::report::{BatchReport, SubmissionOutcome};

/// Console progress reporter.
struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn on_submission_graded(&self, submission_id: &str, band: GradeBand, total_points: u32) {
        eprintln!("  Graded: {submission_id} -> {total_points} P (Note {band})");
    }

    fn on_submission_failed(&self, submission_id: &str, failure: &GradeFailure) {
        eprintln!("  FAILED: {submission_id}: {}", failure.message);
    }

    fn on_batch_complete(&self, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    rubric_path: PathBuf,
    solutions_path: PathBuf,
    concurrency: usize,
    timeout_secs: u64,
    output: PathBuf,
) -> Result<()> {
    anyhow::ensure!(concurrency >= 1, "concurrency must be at least 1");
    anyhow::ensure!(timeout_secs >= 1, "timeout must be at least 1 second");

    let rubric = parser::parse_rubric(&rubric_path)?;

    for w in parser::lint_rubric(&rubric) {
        eprintln!("Warning: {}", w.message);
    }

    let solutions = if solutions_path.is_dir() {
        parser::load_solutions_directory(&solutions_path)?
    } else {
        parser::parse_solutions(&solutions_path)?
    };
    anyhow::ensure!(!solutions.is_empty(), "no solutions to grade");

    eprintln!(
        "Grading {} submission(s) against '{}' ({} criteria, {} points)\n",
        solutions.len(),
        rubric.title(),
        rubric.criteria().len(),
        rubric.max_points()
    );

    let engine = GradeEngine::default();
    let config = BatchConfig {
        concurrency,
        per_submission_timeout: Duration::from_secs(timeout_secs),
        ..BatchConfig::default()
    };

    let report = engine
        .grade_batch(&rubric, solutions, &config, None, &ConsoleObserver)
        .await?;

    print_results(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Report saved to: {}", path.display());

    Ok(())
}

fn print_results(report: &BatchReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Submission", "Points", "Note", "Errors", "Feedback"]);

    for (submission_id, outcome) in &report.outcomes {
        match outcome {
            SubmissionOutcome::Graded {
                scoring,
                band,
                feedback,
            } => {
                let errors = if scoring.detected_errors.is_empty() {
                    "-".to_string()
                } else {
                    scoring
                        .detected_errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                table.add_row(vec![
                    Cell::new(submission_id),
                    Cell::new(format!(
                        "{}/{}",
                        scoring.total_points, report.rubric.max_points
                    )),
                    Cell::new(band.to_string()),
                    Cell::new(errors),
                    Cell::new(feedback),
                ]);
            }
            SubmissionOutcome::Failed { failure } => {
                table.add_row(vec![
                    Cell::new(submission_id),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("{:?}", failure.kind)),
                    Cell::new(&failure.message),
                ]);
            }
        }
    }

    eprintln!("\n{table}");

    let stats = &report.stats;
    if let Some(avg) = stats.average_points {
        eprintln!(
            "\nDurchschnitt: {avg:.1} P  |  Beste Leistung: {} P  |  Bearbeitet: {}",
            stats.best_points.unwrap_or(0),
            stats.graded + stats.failed
        );
    }
}

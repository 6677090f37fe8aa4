//! Scoring engine and batch orchestrator.
//!
//! `score_solution` grades one solution against one rubric. `GradeEngine`
//! fans that out over a batch of submissions with bounded parallelism,
//! per-submission timeouts, and batch-level cancellation. Submissions
//! share no mutable state, so one failure never aborts its siblings.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{watch, Semaphore};
use uuid::Uuid;

use crate::detectors::{default_detectors, ErrorDetector};
use crate::error::{GradeFailure, GradingError};
use crate::feedback::{compose_feedback, FeedbackConfig};
use crate::grade::{map_grade, GradeScale};
use crate::matchers::{CriterionMatcher, RuleMatcher};
use crate::model::{
    CriterionOutcome, ErrorTag, GradeBand, NormalizedSolution, Rubric, ScoringResult,
};
use crate::report::{BatchReport, RubricSummary, SubmissionOutcome};
use crate::statistics::compute_batch_stats;

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum submissions graded concurrently.
    pub concurrency: usize,
    /// Deadline per submission; expiry records a `Timeout` failure for
    /// that submission only.
    pub per_submission_timeout: Duration,
    /// On cancellation, whether in-flight submissions are abandoned or
    /// allowed to finish.
    pub abandon_on_cancel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            per_submission_timeout: Duration::from_secs(30),
            abandon_on_cancel: true,
        }
    }
}

/// Hands out batch-level cancellation.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Stop dispatching new submissions.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cancellation signal passed into `grade_batch`.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    async fn cancelled(&mut self) {
        // Already-cancelled tokens resolve immediately.
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Create a linked cancellation pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Progress reporting trait for batch runs.
pub trait BatchObserver: Send + Sync {
    fn on_submission_graded(&self, submission_id: &str, band: GradeBand, total_points: u32);
    fn on_submission_failed(&self, submission_id: &str, failure: &GradeFailure);
    fn on_batch_complete(&self, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op observer.
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_submission_graded(&self, _: &str, _: GradeBand, _: u32) {}
    fn on_submission_failed(&self, _: &str, _: &GradeFailure) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Score one solution against one rubric.
///
/// Deterministic: identical inputs yield a bit-identical result. Fails
/// with [`GradingError::ExtractionMismatch`] when the solution is
/// malformed (no steps, empty payloads, non-increasing step indices).
pub fn score_solution(
    rubric: &Rubric,
    solution: &NormalizedSolution,
    matcher: &dyn CriterionMatcher,
    detectors: &[Arc<dyn ErrorDetector>],
) -> Result<ScoringResult, GradingError> {
    validate_solution(solution)?;

    let mut per_criterion = Vec::with_capacity(rubric.criteria().len());
    let mut detected_errors = BTreeSet::new();
    let mut raw_total: u64 = 0;

    for criterion in rubric.criteria() {
        let satisfied = matcher.satisfied(criterion, &solution.steps);
        let points_awarded = if satisfied { criterion.points } else { 0 };
        raw_total += u64::from(points_awarded);

        if !satisfied && criterion.required {
            detected_errors.insert(ErrorTag::MissingRequired(criterion.id.clone()));
        }

        per_criterion.push(CriterionOutcome {
            criterion_id: criterion.id.clone(),
            satisfied,
            points_awarded,
        });
    }

    for detector in detectors {
        if let Some(tag) = detector.detect(rubric, solution) {
            tracing::debug!(
                detector = detector.name(),
                submission = %solution.submission_id,
                tag = %tag,
                "detector fired"
            );
            detected_errors.insert(tag);
        }
    }

    // Exceeding the cap means the rubric or a matcher is misconfigured;
    // clamp but never silently.
    let total_points = if raw_total > u64::from(rubric.max_points()) {
        tracing::warn!(
            rubric = rubric.id(),
            submission = %solution.submission_id,
            raw_total,
            max_points = rubric.max_points(),
            "awarded points exceed max_points, clamping"
        );
        rubric.max_points()
    } else {
        raw_total as u32
    };

    Ok(ScoringResult {
        submission_id: solution.submission_id.clone(),
        rubric_id: rubric.id().to_string(),
        total_points,
        per_criterion,
        detected_errors,
    })
}

fn validate_solution(solution: &NormalizedSolution) -> Result<(), GradingError> {
    let mismatch = |detail: String| GradingError::ExtractionMismatch {
        submission_id: solution.submission_id.clone(),
        detail,
    };

    if solution.steps.is_empty() {
        return Err(mismatch("solution has no steps".into()));
    }
    for step in &solution.steps {
        if step.payload.trim().is_empty() {
            return Err(mismatch(format!("step {} has an empty payload", step.index)));
        }
    }
    for pair in solution.steps.windows(2) {
        if pair[1].index <= pair[0].index {
            return Err(mismatch(format!(
                "step indices not strictly increasing ({} then {})",
                pair[0].index, pair[1].index
            )));
        }
    }
    Ok(())
}

/// The grading engine: matcher, detectors, grade scale, and feedback
/// templates bundled for scoring single submissions or whole batches.
pub struct GradeEngine {
    matcher: Arc<dyn CriterionMatcher>,
    detectors: Vec<Arc<dyn ErrorDetector>>,
    scale: Arc<GradeScale>,
    feedback: Arc<FeedbackConfig>,
}

impl Default for GradeEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(RuleMatcher),
            default_detectors(),
            GradeScale::default(),
            FeedbackConfig::default(),
        )
    }
}

impl GradeEngine {
    pub fn new(
        matcher: Arc<dyn CriterionMatcher>,
        detectors: Vec<Arc<dyn ErrorDetector>>,
        scale: GradeScale,
        feedback: FeedbackConfig,
    ) -> Self {
        Self {
            matcher,
            detectors,
            scale: Arc::new(scale),
            feedback: Arc::new(feedback),
        }
    }

    /// Score a single solution with this engine's matcher and detectors.
    pub fn score_solution(
        &self,
        rubric: &Rubric,
        solution: &NormalizedSolution,
    ) -> Result<ScoringResult, GradingError> {
        score_solution(rubric, solution, self.matcher.as_ref(), &self.detectors)
    }

    /// Grade a batch of submissions against one rubric.
    ///
    /// Refuses to start when `max_points` is 0 (the percentage would be
    /// undefined for every submission). Per-submission failures are
    /// collected in the report next to successful results; only
    /// construction-time problems abort the whole batch.
    pub async fn grade_batch(
        &self,
        rubric: &Rubric,
        solutions: Vec<NormalizedSolution>,
        config: &BatchConfig,
        cancel: Option<CancelToken>,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport, GradingError> {
        if rubric.max_points() == 0 {
            return Err(GradingError::DivisionUndefined);
        }

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        let rubric = Arc::new(rubric.clone());
        let timeout = config.per_submission_timeout;
        let abandon_on_cancel = config.abandon_on_cancel;

        let mut futures = FuturesUnordered::new();

        for solution in solutions {
            let semaphore = Arc::clone(&semaphore);
            let rubric = Arc::clone(&rubric);
            let matcher = Arc::clone(&self.matcher);
            let detectors = self.detectors.clone();
            let scale = Arc::clone(&self.scale);
            let feedback = Arc::clone(&self.feedback);
            let cancel = cancel.clone();

            futures.push(async move {
                let submission_id = solution.submission_id.clone();

                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (submission_id, Err(GradeFailure::cancelled()));
                };

                // Cancellation stops dispatch: a submission that has not
                // started yet is recorded as cancelled, not graded.
                if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    return (submission_id, Err(GradeFailure::cancelled()));
                }

                let work = grade_one(
                    rubric, solution, matcher, detectors, scale, feedback, timeout,
                );

                match (cancel, abandon_on_cancel) {
                    (Some(mut token), true) => {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => (submission_id, Err(GradeFailure::cancelled())),
                            outcome = work => (submission_id, outcome),
                        }
                    }
                    _ => (submission_id, work.await),
                }
            });
        }

        let mut outcomes = BTreeMap::new();
        let mut graded = 0usize;
        let mut failed = 0usize;

        while let Some((submission_id, result)) = futures.next().await {
            let outcome = match result {
                Ok((scoring, band, feedback)) => {
                    observer.on_submission_graded(&submission_id, band, scoring.total_points);
                    graded += 1;
                    SubmissionOutcome::Graded {
                        scoring,
                        band,
                        feedback,
                    }
                }
                Err(failure) => {
                    tracing::warn!(
                        submission = %submission_id,
                        kind = ?failure.kind,
                        "submission failed: {}",
                        failure.message
                    );
                    observer.on_submission_failed(&submission_id, &failure);
                    failed += 1;
                    SubmissionOutcome::Failed { failure }
                }
            };
            if outcomes.insert(submission_id.clone(), outcome).is_some() {
                tracing::warn!(
                    submission = %submission_id,
                    "duplicate submission id in batch, keeping the last outcome"
                );
            }
        }

        let elapsed = start.elapsed();
        observer.on_batch_complete(graded, failed, elapsed);

        let stats = compute_batch_stats(&outcomes);
        Ok(BatchReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            rubric: RubricSummary {
                id: rubric.id().to_string(),
                title: rubric.title().to_string(),
                max_points: rubric.max_points(),
                criterion_count: rubric.criteria().len(),
            },
            outcomes,
            stats,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Grade one submission end to end: score, map, compose. Scoring runs on
/// the blocking pool so the timeout can abandon a runaway matcher.
async fn grade_one(
    rubric: Arc<Rubric>,
    solution: NormalizedSolution,
    matcher: Arc<dyn CriterionMatcher>,
    detectors: Vec<Arc<dyn ErrorDetector>>,
    scale: Arc<GradeScale>,
    feedback: Arc<FeedbackConfig>,
    timeout: Duration,
) -> Result<(ScoringResult, GradeBand, String), GradeFailure> {
    let submission_id = solution.submission_id.clone();

    let scoring_task = tokio::task::spawn_blocking(move || {
        score_solution(&rubric, &solution, matcher.as_ref(), &detectors)
            .map(|scoring| (rubric, scoring))
    });

    let (rubric, scoring) = match tokio::time::timeout(timeout, scoring_task).await {
        Err(_) => {
            return Err(GradeFailure::from_error(&GradingError::Timeout {
                submission_id,
                timeout_ms: timeout.as_millis() as u64,
            }));
        }
        Ok(Err(join_err)) => {
            return Err(GradeFailure::new(
                crate::error::FailureKind::Internal,
                format!("scoring worker failed: {join_err}"),
            ));
        }
        Ok(Ok(Err(err))) => return Err(GradeFailure::from_error(&err)),
        Ok(Ok(Ok(pair))) => pair,
    };

    let band = map_grade(scoring.total_points, rubric.max_points(), &scale)
        .map_err(|e| GradeFailure::from_error(&e))?;
    let feedback_text = compose_feedback(band, &scoring.detected_errors, &feedback)
        .map_err(|e| GradeFailure::from_error(&e))?;

    Ok((scoring, band, feedback_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Criterion, CriterionCheck, SolutionStep};

    fn test_rubric() -> Rubric {
        Rubric::new(
            "r1",
            "Flächenberechnung",
            10,
            vec![
                Criterion {
                    id: "c1".into(),
                    description: "Formel angesetzt".into(),
                    points: 6,
                    required: true,
                    check: CriterionCheck::Keyword {
                        any_of: vec!["b*h".into(), "b·h".into()],
                    },
                },
                Criterion {
                    id: "c2".into(),
                    description: "Ergebnis korrekt".into(),
                    points: 4,
                    required: false,
                    check: CriterionCheck::FinalAnswer {
                        expected: 12.0,
                        tolerance: 0.001,
                    },
                },
            ],
            Some(12.0),
            Some("cm²".into()),
        )
        .unwrap()
    }

    fn solution(id: &str, payloads: &[&str]) -> NormalizedSolution {
        NormalizedSolution {
            submission_id: id.into(),
            student: None,
            steps: payloads
                .iter()
                .enumerate()
                .map(|(index, payload)| SolutionStep {
                    index,
                    payload: (*payload).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn scenario_first_criterion_only() {
        // Rubric {max 10, c1: 6 required, c2: 4 optional}; solution
        // satisfies only c1: total 6, no criterion-related tag (c2 is
        // optional and silent).
        let engine = GradeEngine::default();
        let s = solution("s1", &["A = b*h", "A = 11 cm²"]);
        let result = engine.score_solution(&test_rubric(), &s).unwrap();

        assert_eq!(result.total_points, 6);
        assert_eq!(result.per_criterion.len(), 2);
        assert!(result.per_criterion[0].satisfied);
        assert!(!result.per_criterion[1].satisfied);
        assert!(!result
            .detected_errors
            .iter()
            .any(|t| matches!(t, ErrorTag::MissingRequired(_))));

        let band = map_grade(result.total_points, 10, &GradeScale::default()).unwrap();
        assert_eq!(band, GradeBand::Four); // 60%
    }

    #[test]
    fn scenario_nothing_satisfied() {
        let engine = GradeEngine::default();
        let s = solution("s1", &["keine Ahnung", "A = 99 m"]);
        let result = engine.score_solution(&test_rubric(), &s).unwrap();

        assert_eq!(result.total_points, 0);
        assert!(result
            .detected_errors
            .contains(&ErrorTag::MissingRequired("c1".into())));

        let band = map_grade(result.total_points, 10, &GradeScale::default()).unwrap();
        assert_eq!(band, GradeBand::Six);
    }

    #[test]
    fn scoring_is_idempotent() {
        let engine = GradeEngine::default();
        let rubric = test_rubric();
        let s = solution("s1", &["A = b*h", "A = 12,1"]);
        let first = engine.score_solution(&rubric, &s).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.score_solution(&rubric, &s).unwrap(), first);
        }
    }

    #[test]
    fn malformed_solutions_are_extraction_mismatches() {
        let engine = GradeEngine::default();
        let rubric = test_rubric();

        let no_steps = solution("s1", &[]);
        assert!(matches!(
            engine.score_solution(&rubric, &no_steps),
            Err(GradingError::ExtractionMismatch { .. })
        ));

        let empty_payload = solution("s2", &["A = b*h", "   "]);
        assert!(matches!(
            engine.score_solution(&rubric, &empty_payload),
            Err(GradingError::ExtractionMismatch { .. })
        ));

        let mut bad_indices = solution("s3", &["erster", "zweiter 2"]);
        bad_indices.steps[1].index = 0;
        assert!(matches!(
            engine.score_solution(&rubric, &bad_indices),
            Err(GradingError::ExtractionMismatch { .. })
        ));
    }

    #[test]
    fn clamps_total_to_max_points() {
        // max_points 5 with 6+4 optional points available: a solution
        // satisfying both exceeds the cap and must be clamped.
        let rubric = Rubric::new(
            "r2",
            "Clamp",
            5,
            vec![
                Criterion {
                    id: "c1".into(),
                    description: "a".into(),
                    points: 6,
                    required: false,
                    check: CriterionCheck::Keyword { any_of: vec!["b*h".into()] },
                },
                Criterion {
                    id: "c2".into(),
                    description: "b".into(),
                    points: 4,
                    required: false,
                    check: CriterionCheck::Numeric { expected: 12.0, tolerance: 0.5 },
                },
            ],
            None,
            None,
        )
        .unwrap();
        let engine = GradeEngine::default();
        let result = engine
            .score_solution(&rubric, &solution("s1", &["A = b*h = 12"]))
            .unwrap();
        assert_eq!(result.total_points, 5);
    }

    #[tokio::test]
    async fn batch_isolates_failing_submission() {
        let engine = GradeEngine::default();
        let rubric = test_rubric();
        let solutions = vec![
            solution("s1", &["A = b*h", "A = 12 cm²"]),
            solution("s2", &["A = b*h", "A = 12 cm²"]),
            solution("s3", &[]), // extraction mismatch
            solution("s4", &["A = b*h", "A = 12 cm²"]),
            solution("s5", &["A = b*h", "A = 12 cm²"]),
        ];

        let report = engine
            .grade_batch(
                &rubric,
                solutions,
                &BatchConfig::default(),
                None,
                &NoopObserver,
            )
            .await
            .unwrap();

        assert_eq!(report.stats.graded, 4);
        assert_eq!(report.stats.failed, 1);
        for id in ["s1", "s2", "s4", "s5"] {
            assert!(matches!(
                report.outcomes.get(id),
                Some(SubmissionOutcome::Graded { .. })
            ));
        }
        match report.outcomes.get("s3") {
            Some(SubmissionOutcome::Failed { failure }) => {
                assert_eq!(failure.kind, crate::error::FailureKind::ExtractionMismatch);
            }
            other => panic!("expected failed outcome for s3, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_refuses_zero_max_points() {
        let rubric = Rubric::new("r0", "Degenerate", 0, vec![], None, None).unwrap();
        let engine = GradeEngine::default();
        let result = engine
            .grade_batch(
                &rubric,
                vec![solution("s1", &["x = 1"])],
                &BatchConfig::default(),
                None,
                &NoopObserver,
            )
            .await;
        assert!(matches!(result, Err(GradingError::DivisionUndefined)));
    }

    #[tokio::test]
    async fn cancelled_batch_records_cancelled_submissions() {
        let engine = GradeEngine::default();
        let rubric = test_rubric();
        let (handle, token) = cancellation();
        handle.cancel(); // cancel before anything dispatches

        let solutions = (0..8)
            .map(|i| solution(&format!("s{i}"), &["A = b*h", "A = 12 cm²"]))
            .collect();

        let report = engine
            .grade_batch(
                &rubric,
                solutions,
                &BatchConfig {
                    concurrency: 2,
                    ..BatchConfig::default()
                },
                Some(token),
                &NoopObserver,
            )
            .await
            .unwrap();

        assert_eq!(report.stats.graded, 0);
        assert_eq!(report.stats.failed, 8);
        assert!(report.outcomes.values().all(|o| matches!(
            o,
            SubmissionOutcome::Failed { failure } if failure.kind == crate::error::FailureKind::Cancelled
        )));
    }

    /// Stalls every criterion check long enough for a cancel signal to
    /// land while the first submission is in flight.
    struct StallingMatcher;

    impl CriterionMatcher for StallingMatcher {
        fn satisfied(&self, criterion: &Criterion, steps: &[SolutionStep]) -> bool {
            std::thread::sleep(Duration::from_millis(200));
            RuleMatcher.satisfied(criterion, steps)
        }
    }

    fn stalling_engine() -> GradeEngine {
        GradeEngine::new(
            Arc::new(StallingMatcher),
            default_detectors(),
            GradeScale::default(),
            FeedbackConfig::default(),
        )
    }

    fn cancel_after(handle: CancelHandle, delay: Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.cancel();
        });
    }

    #[tokio::test]
    async fn midflight_cancel_abandons_running_submission() {
        let engine = stalling_engine();
        let rubric = test_rubric();
        let (handle, token) = cancellation();
        cancel_after(handle, Duration::from_millis(50));

        let report = engine
            .grade_batch(
                &rubric,
                vec![
                    solution("s1", &["A = b*h", "A = 12 cm²"]),
                    solution("s2", &["A = b*h", "A = 12 cm²"]),
                ],
                &BatchConfig {
                    concurrency: 1,
                    abandon_on_cancel: true,
                    ..BatchConfig::default()
                },
                Some(token),
                &NoopObserver,
            )
            .await
            .unwrap();

        // The in-flight submission is abandoned, the queued one never
        // dispatches; nothing grades.
        assert_eq!(report.stats.graded, 0);
        assert_eq!(report.stats.failed, 2);
        assert!(report.outcomes.values().all(|o| matches!(
            o,
            SubmissionOutcome::Failed { failure } if failure.kind == crate::error::FailureKind::Cancelled
        )));
    }

    #[tokio::test]
    async fn midflight_cancel_lets_running_submission_finish() {
        let engine = stalling_engine();
        let rubric = test_rubric();
        let (handle, token) = cancellation();
        cancel_after(handle, Duration::from_millis(50));

        let report = engine
            .grade_batch(
                &rubric,
                vec![
                    solution("s1", &["A = b*h", "A = 12 cm²"]),
                    solution("s2", &["A = b*h", "A = 12 cm²"]),
                ],
                &BatchConfig {
                    concurrency: 1,
                    abandon_on_cancel: false,
                    ..BatchConfig::default()
                },
                Some(token),
                &NoopObserver,
            )
            .await
            .unwrap();

        // The submission already holding the permit runs to completion;
        // only the queued one records the cancellation.
        assert_eq!(report.stats.graded, 1);
        assert_eq!(report.stats.failed, 1);
        assert!(report.outcomes.values().any(|o| matches!(
            o,
            SubmissionOutcome::Failed { failure } if failure.kind == crate::error::FailureKind::Cancelled
        )));
    }

    #[tokio::test]
    async fn timeout_is_scoped_to_one_submission() {
        struct SlowMatcher;
        impl CriterionMatcher for SlowMatcher {
            fn satisfied(&self, criterion: &Criterion, steps: &[SolutionStep]) -> bool {
                // Only the marked submission stalls.
                if steps.iter().any(|s| s.payload.contains("langsam")) {
                    std::thread::sleep(Duration::from_millis(500));
                }
                RuleMatcher.satisfied(criterion, steps)
            }
        }

        let engine = GradeEngine::new(
            Arc::new(SlowMatcher),
            default_detectors(),
            GradeScale::default(),
            FeedbackConfig::default(),
        );
        let rubric = test_rubric();
        let solutions = vec![
            solution("fast", &["A = b*h", "A = 12 cm²"]),
            solution("slow", &["langsam", "A = 12 cm²"]),
        ];

        let report = engine
            .grade_batch(
                &rubric,
                solutions,
                &BatchConfig {
                    per_submission_timeout: Duration::from_millis(100),
                    ..BatchConfig::default()
                },
                None,
                &NoopObserver,
            )
            .await
            .unwrap();

        assert!(matches!(
            report.outcomes.get("fast"),
            Some(SubmissionOutcome::Graded { .. })
        ));
        match report.outcomes.get("slow") {
            Some(SubmissionOutcome::Failed { failure }) => {
                assert_eq!(failure.kind, crate::error::FailureKind::Timeout);
            }
            other => panic!("expected timeout for slow submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_results_are_keyed_by_submission_id() {
        let engine = GradeEngine::default();
        let rubric = test_rubric();
        let solutions: Vec<_> = (0..12)
            .map(|i| solution(&format!("sub-{i:02}"), &["A = b*h", "A = 12 cm²"]))
            .collect();
        let ids: Vec<String> = solutions.iter().map(|s| s.submission_id.clone()).collect();

        let report = engine
            .grade_batch(
                &rubric,
                solutions,
                &BatchConfig {
                    concurrency: 6,
                    ..BatchConfig::default()
                },
                None,
                &NoopObserver,
            )
            .await
            .unwrap();

        // Completion order may differ from input order; the map key is
        // the contract.
        for id in ids {
            assert!(report.outcomes.contains_key(&id));
        }
        assert_eq!(report.stats.graded, 12);
    }
}

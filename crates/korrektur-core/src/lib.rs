//! korrektur-core — Criterion-based exam grading engine.
//!
//! This crate defines the rubric model, the deterministic scoring
//! engine, grade mapping, feedback composition, and the parallel batch
//! orchestrator that the korrektur tooling builds on.

pub mod detectors;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod grade;
pub mod matchers;
pub mod model;
pub mod parser;
pub mod report;
pub mod statistics;

//! Criterion matchers.
//!
//! A matcher decides whether one criterion is satisfied by a solution's
//! steps. The contract is strict: deterministic for identical inputs and
//! side-effect-free, so grading stays reproducible and auditable.

use crate::model::{Criterion, CriterionCheck, SolutionStep};

/// Decides whether a criterion is satisfied by the solution steps.
///
/// Implementations must be pure: no randomness, no hidden state.
pub trait CriterionMatcher: Send + Sync {
    fn satisfied(&self, criterion: &Criterion, steps: &[SolutionStep]) -> bool;
}

/// Default matcher: interprets the criterion's declarative
/// [`CriterionCheck`] rule.
#[derive(Debug, Default)]
pub struct RuleMatcher;

impl CriterionMatcher for RuleMatcher {
    fn satisfied(&self, criterion: &Criterion, steps: &[SolutionStep]) -> bool {
        match &criterion.check {
            CriterionCheck::Keyword { any_of } => steps.iter().any(|step| {
                let payload = step.payload.to_lowercase();
                any_of.iter().any(|kw| payload.contains(&kw.to_lowercase()))
            }),
            CriterionCheck::Numeric {
                expected,
                tolerance,
            } => steps.iter().any(|step| {
                extract_numbers(&step.payload)
                    .iter()
                    .any(|n| (n - expected).abs() <= *tolerance)
            }),
            CriterionCheck::Unit { unit } => steps.last().is_some_and(|step| {
                step.payload.to_lowercase().contains(&unit.to_lowercase())
            }),
            CriterionCheck::FinalAnswer {
                expected,
                tolerance,
            } => steps.last().is_some_and(|step| {
                extract_numbers(&step.payload)
                    .iter()
                    .any(|n| (n - expected).abs() <= *tolerance)
            }),
        }
    }
}

/// Extract numeric values from a step payload.
///
/// Accepts both decimal point and decimal comma, since extracted
/// solutions frequently carry German notation ("-4,5 cm"). A leading
/// minus is taken as a sign only when it directly precedes the digits
/// and does not follow a digit, letter, or closing parenthesis, so
/// unspaced subtraction like "8-3" reads as two positive values.
pub fn extract_numbers(payload: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    let chars: Vec<char> = payload.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut start = i;
        let negative = i > 0
            && chars[i - 1] == '-'
            && (i == 1 || !(chars[i - 2].is_ascii_alphanumeric() || chars[i - 2] == ')'));
        if negative {
            start -= 1;
        }

        let mut end = i;
        let mut seen_separator = false;
        while end < chars.len() {
            let c = chars[end];
            if c.is_ascii_digit() {
                end += 1;
            } else if (c == '.' || c == ',')
                && !seen_separator
                && end + 1 < chars.len()
                && chars[end + 1].is_ascii_digit()
            {
                seen_separator = true;
                end += 1;
            } else {
                break;
            }
        }

        let token: String = chars[start..end].iter().map(|&c| if c == ',' { '.' } else { c }).collect();
        if let Ok(n) = token.parse::<f64>() {
            numbers.push(n);
        }
        i = end;
    }

    numbers
}

//! Feedback composition.
//!
//! Renders a deterministic natural-language feedback string from a grade
//! band and the detected error tags. All text comes from a template
//! table; there is no randomness anywhere in this path. The default
//! configuration carries German messages.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::{ErrorTag, GradeBand};

/// Which of the four message stems a grade band selects.
///
/// Tiering is its own configuration, independent of the grade threshold
/// table: two institutions can share a grade scale and still phrase
/// feedback differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTier {
    Excellent,
    Good,
    Acceptable,
    NeedsWork,
}

/// Template table for feedback composition.
///
/// Tiering is band-granular: the default map gives band 3 (65–74% on
/// the default scale) the `Good` stem, even though a percentage-based
/// tiering with a 70% cutoff would phrase 65–69% as `Acceptable`. A
/// deployment wanting that cut needs a scale whose bands split at 70%.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawFeedbackConfig")]
pub struct FeedbackConfig {
    tier_stems: BTreeMap<FeedbackTier, String>,
    band_tiers: BTreeMap<GradeBand, FeedbackTier>,
    /// Keyed by [`ErrorTag::lookup_key`]; the `missing-required` entry
    /// may contain a `{criterion}` placeholder.
    error_texts: BTreeMap<String, String>,
    closing: String,
}

#[derive(Debug, Deserialize)]
struct RawFeedbackConfig {
    tier_stems: BTreeMap<FeedbackTier, String>,
    band_tiers: BTreeMap<GradeBand, FeedbackTier>,
    error_texts: BTreeMap<String, String>,
    closing: String,
}

impl TryFrom<RawFeedbackConfig> for FeedbackConfig {
    type Error = GradingError;

    fn try_from(raw: RawFeedbackConfig) -> Result<Self, Self::Error> {
        FeedbackConfig::new(raw.tier_stems, raw.band_tiers, raw.error_texts, raw.closing)
    }
}

impl FeedbackConfig {
    /// Build a validated config: every band must map to a tier, and every
    /// mapped tier must have a stem.
    pub fn new(
        tier_stems: BTreeMap<FeedbackTier, String>,
        band_tiers: BTreeMap<GradeBand, FeedbackTier>,
        error_texts: BTreeMap<String, String>,
        closing: String,
    ) -> Result<Self, GradingError> {
        for band in GradeBand::ALL {
            let tier = band_tiers.get(&band).ok_or_else(|| {
                GradingError::InvalidFeedbackConfig(format!("no tier mapped for band {band}"))
            })?;
            if !tier_stems.contains_key(tier) {
                return Err(GradingError::InvalidFeedbackConfig(format!(
                    "no stem configured for tier {tier:?}"
                )));
            }
        }
        Ok(Self {
            tier_stems,
            band_tiers,
            error_texts,
            closing,
        })
    }

    fn stem_for(&self, band: GradeBand) -> &str {
        // Both lookups are guaranteed by construction.
        let tier = &self.band_tiers[&band];
        &self.tier_stems[tier]
    }

    fn text_for(&self, tag: &ErrorTag) -> Result<String, GradingError> {
        let template = self
            .error_texts
            .get(tag.lookup_key())
            .ok_or_else(|| GradingError::UnknownErrorTag(tag.to_string()))?;
        Ok(match tag {
            ErrorTag::MissingRequired(id) => template.replace("{criterion}", id),
            _ => template.clone(),
        })
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        let tier_stems = BTreeMap::from([
            (
                FeedbackTier::Excellent,
                "Sehr gut! Du hast die Aufgabe korrekt gelöst.".to_string(),
            ),
            (
                FeedbackTier::Good,
                "Gut gemacht! Du hast den Lösungsweg weitgehend richtig.".to_string(),
            ),
            (
                FeedbackTier::Acceptable,
                "Akzeptabel. Du hast einige richtige Ansätze, aber es gibt Verbesserungspotential."
                    .to_string(),
            ),
            (
                FeedbackTier::NeedsWork,
                "Du hast Schwierigkeiten mit dieser Aufgabe. Überarbeite den Lösungsweg."
                    .to_string(),
            ),
        ]);
        let band_tiers = BTreeMap::from([
            (GradeBand::OnePlus, FeedbackTier::Excellent),
            (GradeBand::One, FeedbackTier::Excellent),
            (GradeBand::Two, FeedbackTier::Good),
            (GradeBand::Three, FeedbackTier::Good),
            (GradeBand::Four, FeedbackTier::Acceptable),
            (GradeBand::Five, FeedbackTier::NeedsWork),
            (GradeBand::Six, FeedbackTier::NeedsWork),
        ]);
        let error_texts = BTreeMap::from([
            ("sign-error".to_string(), "Vorzeichenfehler".to_string()),
            ("missing-unit".to_string(), "Einheit vergessen".to_string()),
            (
                "arithmetic-error".to_string(),
                "Rechenfehler in Zwischenschritt".to_string(),
            ),
            (
                "wrong-formula".to_string(),
                "Formel falsch angewendet".to_string(),
            ),
            ("rounding-error".to_string(), "Rundungsfehler".to_string()),
            (
                "incomplete-answer".to_string(),
                "Antwort nicht vollständig".to_string(),
            ),
            (
                "missing-required".to_string(),
                "Pflichtkriterium {criterion} nicht erfüllt".to_string(),
            ),
        ]);
        // Defaults are complete by definition.
        Self::new(
            tier_stems,
            band_tiers,
            error_texts,
            "Überprüfe deine Rechenschritte noch einmal sorgfältig.".to_string(),
        )
        .expect("default feedback config is valid")
    }
}

/// Compose the feedback text for one graded submission.
///
/// Deterministic for identical inputs: stem for the band's tier, then an
/// error-enumeration sentence when the set is non-empty, then the fixed
/// closing sentence. A tag without a lookup entry fails with
/// [`GradingError::UnknownErrorTag`] rather than being silently omitted.
pub fn compose_feedback(
    band: GradeBand,
    errors: &BTreeSet<ErrorTag>,
    config: &FeedbackConfig,
) -> Result<String, GradingError> {
    let mut feedback = String::from(config.stem_for(band));

    if !errors.is_empty() {
        let texts = errors
            .iter()
            .map(|tag| config.text_for(tag))
            .collect::<Result<Vec<_>, _>>()?;
        feedback.push_str(" Achte besonders auf: ");
        feedback.push_str(&texts.join(", "));
        feedback.push('.');
    }

    feedback.push(' ');
    feedback.push_str(&config.closing);
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[ErrorTag]) -> BTreeSet<ErrorTag> {
        list.iter().cloned().collect()
    }

    #[test]
    fn clean_solution_gets_stem_and_closing_only() {
        let config = FeedbackConfig::default();
        let text = compose_feedback(GradeBand::One, &tags(&[]), &config).unwrap();
        assert_eq!(
            text,
            "Sehr gut! Du hast die Aufgabe korrekt gelöst. \
             Überprüfe deine Rechenschritte noch einmal sorgfältig."
        );
    }

    #[test]
    fn errors_are_enumerated_in_deterministic_order() {
        let config = FeedbackConfig::default();
        let text = compose_feedback(
            GradeBand::Four,
            &tags(&[ErrorTag::MissingUnit, ErrorTag::SignError]),
            &config,
        )
        .unwrap();
        assert!(text.starts_with("Akzeptabel."));
        assert!(text.contains("Achte besonders auf:"));
        assert!(text.contains("Vorzeichenfehler"));
        assert!(text.contains("Einheit vergessen"));

        // BTreeSet ordering makes repeated runs byte-identical.
        let again = compose_feedback(
            GradeBand::Four,
            &tags(&[ErrorTag::SignError, ErrorTag::MissingUnit]),
            &config,
        )
        .unwrap();
        assert_eq!(text, again);
    }

    #[test]
    fn missing_required_fills_criterion_placeholder() {
        let config = FeedbackConfig::default();
        let text = compose_feedback(
            GradeBand::Six,
            &tags(&[ErrorTag::MissingRequired("c1".into())]),
            &config,
        )
        .unwrap();
        assert!(text.contains("Pflichtkriterium c1 nicht erfüllt"));
    }

    #[test]
    fn unknown_tag_fails_instead_of_omitting() {
        let config = FeedbackConfig::new(
            FeedbackConfig::default().tier_stems,
            FeedbackConfig::default().band_tiers,
            BTreeMap::new(), // empty lookup
            "Schluss.".into(),
        )
        .unwrap();
        let err =
            compose_feedback(GradeBand::Two, &tags(&[ErrorTag::SignError]), &config).unwrap_err();
        assert!(matches!(err, GradingError::UnknownErrorTag(_)));
        assert!(err.to_string().contains("sign-error"));
    }

    #[test]
    fn config_rejects_unmapped_band() {
        let defaults = FeedbackConfig::default();
        let mut band_tiers = defaults.band_tiers.clone();
        band_tiers.remove(&GradeBand::Three);
        let result = FeedbackConfig::new(
            defaults.tier_stems.clone(),
            band_tiers,
            defaults.error_texts.clone(),
            defaults.closing.clone(),
        );
        assert!(matches!(
            result,
            Err(GradingError::InvalidFeedbackConfig(_))
        ));
    }

    #[test]
    fn config_rejects_tier_without_stem() {
        let defaults = FeedbackConfig::default();
        let mut tier_stems = defaults.tier_stems.clone();
        tier_stems.remove(&FeedbackTier::NeedsWork);
        let result = FeedbackConfig::new(
            tier_stems,
            defaults.band_tiers.clone(),
            defaults.error_texts.clone(),
            defaults.closing.clone(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn composition_is_pure() {
        let config = FeedbackConfig::default();
        let errors = tags(&[ErrorTag::RoundingError]);
        let first = compose_feedback(GradeBand::Three, &errors, &config).unwrap();
        for _ in 0..5 {
            assert_eq!(
                compose_feedback(GradeBand::Three, &errors, &config).unwrap(),
                first
            );
        }
    }
}

//! Confidence filtering for classification results.
//!
//! Backends return the full taxonomy with a confidence per label, most of it
//! noise. The filter keeps labels at or above a confidence floor and force-
//! includes requested identifiers so callers tracking a specific label always
//! see a row for it, even at confidence zero.

use sightkit_utils::ClassificationSettings;

use crate::observation::Classification;

/// Reusable filter over raw classification output.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationFilter {
    min_confidence: f32,
    include_identifiers: Vec<String>,
}

impl ClassificationFilter {
    /// Builds a filter from a confidence floor and forced identifiers.
    pub fn new(min_confidence: f32, include_identifiers: Vec<String>) -> Self {
        Self {
            min_confidence,
            include_identifiers,
        }
    }

    /// Applies the filter, preserving the backend's result order.
    ///
    /// Labels meeting the floor come first, in their original order. Forced
    /// identifiers that did not make the cut are appended afterwards with
    /// their observed confidence, or `0.0` when the backend never scored
    /// them.
    pub fn apply(&self, observations: &[Classification]) -> Vec<Classification> {
        let mut kept: Vec<Classification> = observations
            .iter()
            .filter(|obs| obs.confidence >= self.min_confidence)
            .cloned()
            .collect();

        for identifier in &self.include_identifiers {
            if kept.iter().any(|obs| &obs.identifier == identifier) {
                continue;
            }
            let confidence = observations
                .iter()
                .find(|obs| &obs.identifier == identifier)
                .map(|obs| obs.confidence)
                .unwrap_or(0.0);
            kept.push(Classification {
                identifier: identifier.clone(),
                confidence,
            });
        }

        kept
    }
}

impl From<&ClassificationSettings> for ClassificationFilter {
    fn from(settings: &ClassificationSettings) -> Self {
        Self::new(
            settings.min_confidence,
            settings.include_identifiers.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(identifier: &str, confidence: f32) -> Classification {
        Classification {
            identifier: identifier.to_string(),
            confidence,
        }
    }

    #[test]
    fn keeps_labels_at_or_above_floor_in_order() {
        let filter = ClassificationFilter::new(0.4, Vec::new());
        let results = filter.apply(&[
            label("outdoor", 0.9),
            label("sky", 0.4),
            label("cat", 0.39),
            label("document", 0.1),
        ]);
        assert_eq!(results, vec![label("outdoor", 0.9), label("sky", 0.4)]);
    }

    #[test]
    fn forced_identifier_keeps_observed_confidence() {
        let filter = ClassificationFilter::new(0.4, vec!["cat".to_string()]);
        let results = filter.apply(&[label("outdoor", 0.9), label("cat", 0.12)]);
        assert_eq!(results, vec![label("outdoor", 0.9), label("cat", 0.12)]);
    }

    #[test]
    fn forced_identifier_missing_from_results_scores_zero() {
        let filter = ClassificationFilter::new(0.4, vec!["unicorn".to_string()]);
        let results = filter.apply(&[label("outdoor", 0.9)]);
        assert_eq!(results, vec![label("outdoor", 0.9), label("unicorn", 0.0)]);
    }

    #[test]
    fn forced_identifier_already_passing_is_not_duplicated() {
        let filter = ClassificationFilter::new(0.4, vec!["outdoor".to_string()]);
        let results = filter.apply(&[label("outdoor", 0.9), label("sky", 0.5)]);
        assert_eq!(results, vec![label("outdoor", 0.9), label("sky", 0.5)]);
    }

    #[test]
    fn settings_conversion_carries_both_knobs() {
        let mut settings = ClassificationSettings::default();
        settings.min_confidence = 0.25;
        settings.include_identifiers = vec!["dog".to_string()];
        let filter = ClassificationFilter::from(&settings);
        let results = filter.apply(&[label("dog", 0.05), label("cat", 0.3)]);
        assert_eq!(results, vec![label("cat", 0.3), label("dog", 0.05)]);
    }

    #[test]
    fn empty_input_yields_only_forced_rows() {
        let filter = ClassificationFilter::new(0.4, vec!["cat".to_string()]);
        assert_eq!(filter.apply(&[]), vec![label("cat", 0.0)]);

        let no_forced = ClassificationFilter::new(0.4, Vec::new());
        assert!(no_forced.apply(&[]).is_empty());
    }
}

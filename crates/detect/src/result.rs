//! Aggregate detection outcome.

use serde::Serialize;

use crate::element::FormElement;

/// Score at or above which a page with enough fields counts as a form.
const SCORE_GATE: f64 = 0.4;
/// Fields required for the score-based detection path.
const FIELD_GATE: usize = 2;

/// Outcome of one `analyze_page` call. Scores are always finite and in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    form_count: usize,
    field_count: usize,
    detection_score: f64,
    confidence: f64,
    form_elements: Vec<FormElement>,
}

impl DetectionResult {
    /// Build a result, coercing non-finite scores to 0 and clamping to [0, 1].
    pub fn new(
        form_count: usize,
        field_count: usize,
        detection_score: f64,
        confidence: f64,
        form_elements: Vec<FormElement>,
    ) -> Self {
        Self {
            form_count,
            field_count,
            detection_score: clamp01(detection_score),
            confidence: clamp01(confidence),
            form_elements,
        }
    }

    /// A page is a form if it has candidate elements, or if it has enough
    /// fields and a strong enough heuristic score.
    pub fn is_form_detected(&self) -> bool {
        self.form_count > 0 || (self.field_count >= FIELD_GATE && self.detection_score >= SCORE_GATE)
    }

    pub fn form_count(&self) -> usize {
        self.form_count
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn score(&self) -> f64 {
        self.detection_score
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn form_elements(&self) -> &[FormElement] {
        &self.form_elements
    }
}

impl Default for DetectionResult {
    fn default() -> Self {
        Self::new(0, 0, 0.0, 0.0, Vec::new())
    }
}

pub(crate) fn clamp01(n: f64) -> f64 {
    if n.is_finite() {
        n.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_clamped() {
        let r = DetectionResult::new(0, 0, 1.7, -0.2, Vec::new());
        assert_eq!(r.score(), 1.0);
        assert_eq!(r.confidence(), 0.0);
    }

    #[test]
    fn non_finite_scores_become_zero() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let r = DetectionResult::new(1, 1, bad, bad, Vec::new());
            assert_eq!(r.score(), 0.0);
            assert_eq!(r.confidence(), 0.0);
        }
    }

    #[test]
    fn clamping_is_idempotent() {
        let a = DetectionResult::new(0, 3, f64::NAN, 4.2, Vec::new());
        let b = DetectionResult::new(0, 3, f64::NAN, 4.2, Vec::new());
        assert_eq!(a, b);
        let again = DetectionResult::new(0, 3, a.score(), a.confidence(), Vec::new());
        assert_eq!(a, again);
    }

    #[test]
    fn detected_via_form_count() {
        assert!(DetectionResult::new(1, 0, 0.0, 0.0, Vec::new()).is_form_detected());
    }

    #[test]
    fn detected_via_fields_and_score() {
        assert!(DetectionResult::new(0, 2, 0.4, 0.0, Vec::new()).is_form_detected());
        assert!(!DetectionResult::new(0, 1, 0.9, 0.0, Vec::new()).is_form_detected());
        assert!(!DetectionResult::new(0, 5, 0.39, 0.0, Vec::new()).is_form_detected());
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(DetectionResult::default()).unwrap();
        for key in ["formCount", "fieldCount", "detectionScore", "confidence", "formElements"] {
            assert!(v.get(key).is_some(), "missing {}", key);
        }
    }
}

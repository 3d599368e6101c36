//! High-level orchestrator that coordinates individual detectors and
//! produces a [`DetectionResult`].

use tracing::debug;

use autofill_core::config::DetectionConfig;
use autofill_core::PageSnapshot;

use crate::element::FormElementDetector;
use crate::heuristic::{HeuristicDetector, KeywordDictionaries};
use crate::mass::FieldMassDetector;
use crate::observer::{DynamicContentObserver, ObservationEvent, ObserverConfig};
use crate::result::DetectionResult;

// Signal weights for the detection score.
const URL_WEIGHT: f64 = 0.3;
const PAGE_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.3;

// Contributions to confidence.
const VALID_ELEMENTS_WEIGHT: f64 = 0.3;
const THRESHOLD_WEIGHT: f64 = 0.4;
const HEURISTIC_WEIGHT: f64 = 0.3;

/// Composes element, field-mass, and heuristic detection into one call.
///
/// Analysis never fails: malformed or missing inputs only pull the scores
/// toward zero.
#[derive(Debug, Default)]
pub struct FormDetector {
    element_detector: FormElementDetector,
    mass_detector: FieldMassDetector,
    heuristic_detector: HeuristicDetector,
    observer: DynamicContentObserver,
}

impl FormDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            element_detector: FormElementDetector::new(),
            mass_detector: FieldMassDetector::new(config.minimum_threshold),
            heuristic_detector: HeuristicDetector::default(),
            observer: DynamicContentObserver::new(ObserverConfig::from(config)),
        }
    }

    /// Replace the keyword dictionaries used by the heuristic signals.
    pub fn with_dictionaries(mut self, dictionaries: KeywordDictionaries) -> Self {
        self.heuristic_detector = HeuristicDetector::new(dictionaries);
        self
    }

    pub fn analyze_page(&self, page: &PageSnapshot) -> DetectionResult {
        let title = page.title.as_deref();
        let content = page.content.as_deref();

        let form_elements = self.element_detector.find_form_elements(&page.fields);
        let elements_valid = self.element_detector.validate_form_elements(&form_elements);

        let stats = self.mass_detector.count_fillable_fields(&page.fields);
        let passes_threshold = self.mass_detector.check_threshold(Some(&stats));

        let url_score = self.heuristic_detector.analyze_url(&page.url);
        let page_score = self.heuristic_detector.scan_page_content(title, content);
        let keyword_score = self.heuristic_detector.check_keywords(title, content);

        let detection_score =
            url_score * URL_WEIGHT + page_score * PAGE_WEIGHT + keyword_score * KEYWORD_WEIGHT;
        let heuristic_mean = (url_score + page_score + keyword_score) / 3.0;
        let confidence = f64::min(
            1.0,
            if elements_valid { VALID_ELEMENTS_WEIGHT } else { 0.0 }
                + if passes_threshold { THRESHOLD_WEIGHT } else { 0.0 }
                + heuristic_mean * HEURISTIC_WEIGHT,
        );

        debug!(
            url = %page.url,
            elements = form_elements.len(),
            elements_valid,
            fillable = stats.fillable_fields,
            passes_threshold,
            url_score,
            page_score,
            keyword_score,
            "page analyzed"
        );

        DetectionResult::new(
            form_elements.len(),
            stats.total_fields,
            detection_score,
            confidence,
            form_elements,
        )
    }

    /// Alias of [`analyze_page`](Self::analyze_page).
    pub fn detect_forms(&self, page: &PageSnapshot) -> DetectionResult {
        self.analyze_page(page)
    }

    pub fn start_observation<F>(&mut self, callback: F)
    where
        F: Fn(ObservationEvent) + Send + 'static,
    {
        self.observer.start_watching(callback);
    }

    pub fn stop_observation(&mut self) {
        self.observer.stop_watching();
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_watching()
    }
}

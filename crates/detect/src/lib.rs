//! Multi-signal form-presence classifier.
//!
//! This crate provides:
//! - Candidate element extraction and validation ([`FormElementDetector`])
//! - Fillable field counting and type histograms ([`FieldMassDetector`])
//! - Keyword heuristics over URL, title, and body text ([`HeuristicDetector`])
//! - The [`FormDetector`] orchestrator producing a [`DetectionResult`]
//! - A lifecycle hook for push-based re-detection ([`DynamicContentObserver`])

pub mod detector;
pub mod element;
pub mod heuristic;
pub mod mass;
pub mod observer;
pub mod result;

pub use detector::FormDetector;
pub use element::{FormElement, FormElementDetector};
pub use heuristic::{HeuristicDetector, KeywordDictionaries};
pub use mass::{FieldMassDetector, FieldMassStats, FieldTypeAnalysis};
pub use observer::{DynamicContentObserver, ObservationEvent, ObserverConfig};
pub use result::DetectionResult;

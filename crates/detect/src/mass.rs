//! Fillable field counting and type histograms.

use indexmap::IndexMap;
use serde::Serialize;

use autofill_core::FieldFeature;

/// Input types a user can type a value into.
pub const FILLABLE_TYPES: &[&str] = &["text", "email", "tel", "password", "url", "search", "number"];

/// Counts produced by [`FieldMassDetector::count_fillable_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMassStats {
    pub total_fields: usize,
    pub fillable_fields: usize,
    /// Histogram by lower-cased type, in first-seen order.
    pub type_counts: IndexMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldTypeAnalysis {
    pub type_counts: IndexMap<String, usize>,
    /// Most frequent type; `None` for an empty field list.
    pub dominant_type: Option<String>,
}

/// Computes counts and thresholds for fillable fields.
#[derive(Debug, Clone)]
pub struct FieldMassDetector {
    minimum_threshold: usize,
}

impl Default for FieldMassDetector {
    fn default() -> Self {
        Self::new(2)
    }
}

impl FieldMassDetector {
    pub fn new(minimum_threshold: usize) -> Self {
        Self { minimum_threshold }
    }

    pub fn count_fillable_fields(&self, fields: &[FieldFeature]) -> FieldMassStats {
        let mut stats = FieldMassStats::default();
        for field in fields {
            let t = field.normalized_type();
            stats.total_fields += 1;
            if FILLABLE_TYPES.contains(&t.as_str()) {
                stats.fillable_fields += 1;
            }
            *stats.type_counts.entry(t).or_insert(0) += 1;
        }
        stats
    }

    /// Histogram plus the dominant type. Ties go to the type seen first.
    pub fn analyze_field_types(&self, fields: &[FieldFeature]) -> FieldTypeAnalysis {
        let type_counts = self.count_fillable_fields(fields).type_counts;
        let mut dominant: Option<(&String, usize)> = None;
        for (t, &count) in &type_counts {
            match dominant {
                Some((_, best)) if best >= count => {}
                _ => dominant = Some((t, count)),
            }
        }
        let dominant_type = dominant.map(|(t, _)| t.clone());
        FieldTypeAnalysis {
            type_counts,
            dominant_type,
        }
    }

    /// Missing stats count as zero fillable fields.
    pub fn check_threshold(&self, stats: Option<&FieldMassStats>) -> bool {
        stats.map(|s| s.fillable_fields).unwrap_or(0) >= self.minimum_threshold
    }
}

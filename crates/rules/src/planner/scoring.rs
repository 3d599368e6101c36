//! Matcher compilation and field scoring.
//!
//! Raw score: +0.2 for an exact type match, +1 for each of label, name,
//! placeholder, and id whose regex matches. The weighted score multiplies
//! by `1 + priority / 1000`, so priority reorders close calls without
//! overturning a clearly stronger textual match.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use autofill_core::FieldFeature;

use crate::schema::{FieldMatcher, MatchSpec, ValueSource};

const TYPE_MATCH_SCORE: f64 = 0.2;
const TEXT_MATCH_SCORE: f64 = 1.0;
const PRIORITY_SCALE: f64 = 1000.0;

/// A [`FieldMatcher`] with its regexes compiled and its rule priority attached.
///
/// A regex that fails to compile is stored as `None` and never matches.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub field_key: String,
    pub priority: i64,
    pub value_source: ValueSource,
    input_type: Option<String>,
    label: Option<Regex>,
    name: Option<Regex>,
    placeholder: Option<Regex>,
    id: Option<Regex>,
}

impl CompiledMatcher {
    pub fn compile(matcher: &FieldMatcher, priority: i64) -> Self {
        let spec: &MatchSpec = &matcher.match_spec;
        let compile = |pattern: &Option<String>, attr: &str| {
            pattern
                .as_deref()
                .and_then(|p| compile_pattern(p, &matcher.field_key, attr))
        };
        Self {
            field_key: matcher.field_key.clone(),
            priority,
            value_source: matcher.value_source.clone(),
            input_type: spec
                .input_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase),
            label: compile(&spec.label_regex, "label"),
            name: compile(&spec.name_regex, "name"),
            placeholder: compile(&spec.placeholder_regex, "placeholder"),
            id: compile(&spec.id_regex, "id"),
        }
    }

    /// Unweighted score in `[0, 4.2]`.
    pub fn raw_score(&self, field: &FieldFeature) -> f64 {
        let mut score = 0.0;
        if let Some(t) = &self.input_type {
            if *t == field.normalized_type() {
                score += TYPE_MATCH_SCORE;
            }
        }
        score += text_score(field.label.as_deref(), self.label.as_ref());
        score += text_score(field.name.as_deref(), self.name.as_ref());
        score += text_score(field.placeholder.as_deref(), self.placeholder.as_ref());
        score += text_score(field.id.as_deref(), self.id.as_ref());
        score
    }

    pub fn score(&self, field: &FieldFeature) -> f64 {
        self.raw_score(field) * (1.0 + self.priority as f64 / PRIORITY_SCALE)
    }
}

fn compile_pattern(pattern: &str, field_key: &str, attr: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(field_key, attr, pattern, error = %e, "invalid matcher regex, criterion disabled");
            None
        }
    }
}

fn text_score(text: Option<&str>, regex: Option<&Regex>) -> f64 {
    match (text, regex) {
        (Some(t), Some(re)) if !t.is_empty() && re.is_match(t) => TEXT_MATCH_SCORE,
        _ => 0.0,
    }
}

/// Highest-scoring matcher for `field`. The earliest matcher wins ties and
/// a zero score never wins.
pub fn best_match<'a>(
    matchers: &'a [CompiledMatcher],
    field: &FieldFeature,
) -> Option<(&'a CompiledMatcher, f64)> {
    let mut best: Option<(&CompiledMatcher, f64)> = None;
    for m in matchers {
        let score = m.score(field);
        if score > best.map(|(_, s)| s).unwrap_or(0.0) {
            best = Some((m, score));
        }
    }
    best
}

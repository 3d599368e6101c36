//! Field matchers: how a rule recognizes a field and where its value comes from.

use serde::{Deserialize, Serialize};

/// Criteria a field is scored against.
///
/// Each regex is matched case-insensitively against the corresponding field
/// attribute; `type` is an exact comparison with the field's input type.
/// An empty spec is accepted and simply never scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_regex: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

impl MatchSpec {
    pub fn label(pattern: impl Into<String>) -> Self {
        Self {
            label_regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, pattern: impl Into<String>) -> Self {
        self.name_regex = Some(pattern.into());
        self
    }

    pub fn with_placeholder(mut self, pattern: impl Into<String>) -> Self {
        self.placeholder_regex = Some(pattern.into());
        self
    }

    pub fn with_id(mut self, pattern: impl Into<String>) -> Self {
        self.id_regex = Some(pattern.into());
        self
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// True when no criterion is declared.
    pub fn is_empty(&self) -> bool {
        self.label_regex.is_none()
            && self.name_regex.is_none()
            && self.placeholder_regex.is_none()
            && self.id_regex.is_none()
            && self.input_type.is_none()
    }
}

/// Where a matched field's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueSource {
    /// Look up `key` in the user's profile.
    Profile { key: String },
    /// Look up `key` in the user's free-text answers.
    Answer { key: String },
    /// Invoke a named built-in function.
    Function {
        name: String,
        #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
        params: serde_json::Map<String, serde_json::Value>,
    },
    /// A literal value.
    Constant { value: String },
}

impl ValueSource {
    pub fn profile(key: impl Into<String>) -> Self {
        ValueSource::Profile { key: key.into() }
    }

    pub fn answer(key: impl Into<String>) -> Self {
        ValueSource::Answer { key: key.into() }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        ValueSource::Constant {
            value: value.into(),
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        ValueSource::Function {
            name: name.into(),
            params: serde_json::Map::new(),
        }
    }

    /// Add a function parameter. No effect on non-function sources.
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if let ValueSource::Function { params, .. } = &mut self {
            params.insert(key.into(), value);
        }
        self
    }
}

/// One semantic target (`field_key`) a rule knows how to recognize and fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMatcher {
    pub field_key: String,
    #[serde(default, rename = "match")]
    pub match_spec: MatchSpec,
    pub value_source: ValueSource,
}

impl FieldMatcher {
    pub fn new(field_key: impl Into<String>, match_spec: MatchSpec, value_source: ValueSource) -> Self {
        Self {
            field_key: field_key.into(),
            match_spec,
            value_source,
        }
    }
}

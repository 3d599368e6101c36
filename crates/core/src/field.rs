//! Field features: the caller-extracted description of one form input.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Input type assumed when the extractor reports none.
pub const DEFAULT_INPUT_TYPE: &str = "text";

/// One observed input on a page.
///
/// Produced by the DOM-extraction collaborator. `selector` is the caller's
/// locator and is expected to be unique within a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFeature {
    #[serde(default)]
    pub selector: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_attrs: BTreeMap<String, String>,
}

impl FieldFeature {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into().to_lowercase());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_aria_label(mut self, aria_label: impl Into<String>) -> Self {
        self.aria_label = Some(aria_label.into());
        self
    }

    pub fn with_data_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_attrs.insert(key.into(), value.into());
        self
    }

    /// Lower-cased input type, `"text"` when missing or blank.
    pub fn normalized_type(&self) -> String {
        match self.input_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => DEFAULT_INPUT_TYPE.to_string(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.normalized_type() == "file"
    }

    pub fn has_selector(&self) -> bool {
        !self.selector.is_empty()
    }
}

/// Deserialize a field list without ever failing.
///
/// A non-array value yields an empty list. Object entries are kept even when
/// some attributes have the wrong type; see [`fields_from_value`].
pub fn deserialize_fields_lenient<'de, D>(deserializer: D) -> Result<Vec<FieldFeature>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(fields_from_value(value))
}

/// Parse a loosely-typed JSON value into field features.
///
/// Non-object entries are skipped. Within an object, numeric and boolean
/// attributes are read as text and any other mistyped attribute is dropped,
/// so the field itself still reaches the planner.
pub fn fields_from_value(value: serde_json::Value) -> Vec<FieldFeature> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(map) => Some(field_from_object(map)),
                other => {
                    tracing::debug!(entry = %other, "dropping non-object field feature");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn field_from_object(map: serde_json::Map<String, serde_json::Value>) -> FieldFeature {
    let value = serde_json::Value::Object(map);
    if let Ok(field) = serde_json::from_value::<FieldFeature>(value.clone()) {
        return field;
    }

    let attr = |key: &str| {
        let text = value.get(key).and_then(scalar_text);
        if text.is_none() && value.get(key).map_or(false, |v| !v.is_null()) {
            tracing::debug!(attribute = key, "dropping mistyped field attribute");
        }
        text
    };
    let data_attrs = value
        .get("data_attrs")
        .and_then(serde_json::Value::as_object)
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(|(k, v)| scalar_text(v).map(|t| (k.clone(), t)))
                .collect()
        })
        .unwrap_or_default();

    FieldFeature {
        selector: attr("selector").unwrap_or_default(),
        input_type: attr("type"),
        name: attr("name"),
        id: attr("id"),
        placeholder: attr("placeholder"),
        label: attr("label"),
        aria_label: attr("aria_label"),
        data_attrs,
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

//! Candidate form element extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use autofill_core::FieldFeature;

/// A field normalized into the shape the detector reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    pub selector: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: Option<String>,
    pub id: Option<String>,
    pub placeholder: Option<String>,
    pub label: Option<String>,
    pub aria_label: Option<String>,
    pub data_attrs: BTreeMap<String, String>,
}

impl FormElement {
    /// True when the element carries a `name`, `id`, or `label`.
    pub fn is_identified(&self) -> bool {
        [&self.name, &self.id, &self.label]
            .iter()
            .any(|attr| attr.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// Identifies candidate form elements from provided field features.
#[derive(Debug, Clone, Default)]
pub struct FormElementDetector;

impl FormElementDetector {
    pub fn new() -> Self {
        Self
    }

    /// Drop fields without a selector and normalize the rest.
    ///
    /// The declared type is kept as given, falling back to `"text"`.
    pub fn find_form_elements(&self, fields: &[FieldFeature]) -> Vec<FormElement> {
        fields
            .iter()
            .filter(|f| f.has_selector())
            .map(|f| FormElement {
                selector: f.selector.clone(),
                input_type: f
                    .input_type
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| autofill_core::DEFAULT_INPUT_TYPE.to_string()),
                name: f.name.clone(),
                id: f.id.clone(),
                placeholder: f.placeholder.clone(),
                label: f.label.clone(),
                aria_label: f.aria_label.clone(),
                data_attrs: f.data_attrs.clone(),
            })
            .collect()
    }

    /// A set is form-like when it is non-empty and at least one element
    /// is identified. Anonymous inputs alone never validate.
    pub fn validate_form_elements(&self, elements: &[FormElement]) -> bool {
        !elements.is_empty() && elements.iter().any(FormElement::is_identified)
    }
}

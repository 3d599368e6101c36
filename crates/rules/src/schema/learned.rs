//! Learned selector mappings taught by the user.

use serde::{Deserialize, Serialize};

/// An explicit selector → field key override for one domain.
///
/// When present for a field's exact selector it takes precedence over all
/// rule and generic scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMapping {
    pub selector: String,
    pub field_key: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

impl LearnedMapping {
    pub fn new(selector: impl Into<String>, field_key: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            field_key: field_key.into(),
            input_type: None,
        }
    }
}

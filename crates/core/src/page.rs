//! In-process request contracts for detection and planning.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{AutofillError, Result};
use crate::field::{deserialize_fields_lenient, FieldFeature};

/// Everything the detector needs to know about a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_fields_lenient")]
    pub fields: Vec<FieldFeature>,
}

impl PageSnapshot {
    /// Parse a detection payload. Only non-JSON input is an error; missing
    /// or malformed members degrade to defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json(&std::io::read_to_string(reader)?)
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldFeature>) -> Self {
        self.fields = fields;
        self
    }
}

/// A page's fields submitted for fill planning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_fields_lenient")]
    pub fields: Vec<FieldFeature>,
}

impl PlanRequest {
    /// Parse a planning payload, requiring a non-empty `url`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(raw)?;
        if request.url.trim().is_empty() {
            return Err(AutofillError::InvalidInput("url is required".to_string()));
        }
        Ok(request)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json(&std::io::read_to_string(reader)?)
    }

    pub fn new(url: impl Into<String>, fields: Vec<FieldFeature>) -> Self {
        Self {
            url: url.into(),
            fields,
        }
    }
}

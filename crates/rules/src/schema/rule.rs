//! Site-scoped match rules and the YAML document that carries them.

use serde::{Deserialize, Serialize};

use super::{CommonMetadata, FieldMatcher};

/// `site_pattern` that applies a rule to every domain.
pub const WILDCARD_SITE: &str = "*";

/// Expected `kind` of a rule file.
pub const MATCH_RULE_KIND: &str = "MatchRule";

/// A site-scoped autofill rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Exact hostname, or `*` for every site.
    pub site_pattern: String,
    /// Higher wins ties between otherwise equal matches. Zero means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default)]
    pub field_matchers: Vec<FieldMatcher>,
}

impl MatchRule {
    pub fn new(site_pattern: impl Into<String>) -> Self {
        Self {
            id: None,
            site_pattern: site_pattern.into(),
            priority: None,
            field_matchers: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_matcher(mut self, matcher: FieldMatcher) -> Self {
        self.field_matchers.push(matcher);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.site_pattern == WILDCARD_SITE
    }

    /// Whether the rule applies to `domain` (exact hostname or wildcard).
    pub fn applies_to(&self, domain: &str) -> bool {
        self.is_wildcard() || self.site_pattern.eq_ignore_ascii_case(domain)
    }

    /// Declared priority, or `default` when it is absent or zero.
    pub fn priority_or(&self, default: i64) -> i64 {
        self.priority.filter(|p| *p != 0).unwrap_or(default)
    }
}

/// A rule file: header plus a [`MatchRule`] spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatchRuleDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: MatchRule,
}

impl MatchRuleDocument {
    /// The spec, stamped with `metadata.id` when it carries no id of its own.
    pub fn rule(&self) -> MatchRule {
        let mut rule = self.spec.clone();
        if rule.id.is_none() {
            rule.id = Some(self.metadata.id.clone());
        }
        rule
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

//! The planning input bundle.

use std::collections::HashMap;

use crate::repository::RuleRepository;
use crate::schema::{LearnedMapping, MatchRule};

/// Learned mappings keyed by exact selector.
///
/// When several mappings share a selector the first one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnedMappings {
    by_selector: HashMap<String, LearnedMapping>,
}

impl LearnedMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, selector: &str) -> Option<&LearnedMapping> {
        self.by_selector.get(selector)
    }

    pub fn insert(&mut self, mapping: LearnedMapping) {
        self.by_selector
            .entry(mapping.selector.clone())
            .or_insert(mapping);
    }

    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }
}

impl FromIterator<LearnedMapping> for LearnedMappings {
    fn from_iter<I: IntoIterator<Item = LearnedMapping>>(iter: I) -> Self {
        let mut mappings = Self::new();
        for m in iter {
            mappings.insert(m);
        }
        mappings
    }
}

/// Everything the planner consults besides the page itself.
///
/// Assembled by the caller; the planner never touches storage.
#[derive(Debug, Clone, Default)]
pub struct MatchingContext {
    pub profile: HashMap<String, String>,
    pub answers: HashMap<String, String>,
    /// Rules for the current domain plus wildcard rules.
    pub rules: Vec<MatchRule>,
    pub learned_mappings: LearnedMappings,
}

impl MatchingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the context for `domain` from a repository.
    pub fn from_repository<R: RuleRepository + ?Sized>(repo: &R, domain: &str) -> Self {
        Self {
            profile: repo.profile(),
            answers: repo.answers(),
            rules: repo.list_rules_by_domain(domain),
            learned_mappings: repo.list_learned_mappings(domain).into_iter().collect(),
        }
    }

    pub fn with_profile<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.profile
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_answers<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.answers
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_learned_mapping(mut self, mapping: LearnedMapping) -> Self {
        self.learned_mappings.insert(mapping);
        self
    }

    /// Non-empty profile value for `key`.
    pub fn profile_value(&self, key: &str) -> Option<&str> {
        self.profile.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Non-empty answer value for `key`.
    pub fn answer_value(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_mapping_per_selector_wins() {
        let mappings: LearnedMappings = vec![
            LearnedMapping::new("#a", "email"),
            LearnedMapping::new("#a", "phone"),
            LearnedMapping::new("#b", "city"),
        ]
        .into_iter()
        .collect();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings.get("#a").map(|m| m.field_key.as_str()), Some("email"));
    }

    #[test]
    fn empty_values_are_not_usable() {
        let ctx = MatchingContext::new()
            .with_profile([("email", ""), ("phone", "555")])
            .with_answers([("why", "")]);
        assert_eq!(ctx.profile_value("email"), None);
        assert_eq!(ctx.profile_value("phone"), Some("555"));
        assert_eq!(ctx.answer_value("why"), None);
        assert_eq!(ctx.answer_value("missing"), None);
    }
}

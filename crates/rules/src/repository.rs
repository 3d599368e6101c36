//! Collaborator contract for profile, answer, rule, and learned-mapping storage.
//!
//! The planner never reads storage itself; callers use a [`RuleRepository`]
//! to assemble a [`MatchingContext`](crate::MatchingContext) per request.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::schema::{LearnedMapping, MatchRule};

/// Read side of the rule/profile store.
pub trait RuleRepository {
    /// Rules for `domain` plus wildcard rules, highest priority first.
    fn list_rules_by_domain(&self, domain: &str) -> Vec<MatchRule>;

    /// Learned mappings recorded for exactly `domain`.
    fn list_learned_mappings(&self, domain: &str) -> Vec<LearnedMapping>;

    fn profile(&self) -> HashMap<String, String>;

    fn answers(&self) -> HashMap<String, String>;
}

/// Process-local repository backed by `RwLock`ed maps.
#[derive(Debug)]
pub struct InMemoryRepository {
    profile: RwLock<HashMap<String, String>>,
    answers: RwLock<HashMap<String, String>>,
    rules: RwLock<Vec<MatchRule>>,
    learned: RwLock<HashMap<String, Vec<LearnedMapping>>>,
    default_priority: i64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_default_priority(100)
    }

    /// Priority used to order rules that do not declare one.
    pub fn with_default_priority(default_priority: i64) -> Self {
        Self {
            profile: RwLock::new(HashMap::new()),
            answers: RwLock::new(HashMap::new()),
            rules: RwLock::new(Vec::new()),
            learned: RwLock::new(HashMap::new()),
            default_priority,
        }
    }

    /// Merge `profile` into the stored profile; incoming keys overwrite.
    pub fn upsert_profile(&self, profile: HashMap<String, String>) {
        self.profile
            .write()
            .expect("profile lock poisoned")
            .extend(profile);
    }

    pub fn upsert_answers(&self, answers: HashMap<String, String>) {
        self.answers
            .write()
            .expect("answers lock poisoned")
            .extend(answers);
    }

    pub fn insert_rule(&self, rule: MatchRule) {
        debug!(site = %rule.site_pattern, id = ?rule.id, "rule inserted");
        self.rules.write().expect("rules lock poisoned").push(rule);
    }

    pub fn insert_learned_mapping(&self, domain: &str, mapping: LearnedMapping) {
        debug!(domain, selector = %mapping.selector, field_key = %mapping.field_key, "learned mapping inserted");
        self.learned
            .write()
            .expect("learned lock poisoned")
            .entry(domain.to_string())
            .or_default()
            .push(mapping);
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRepository for InMemoryRepository {
    fn list_rules_by_domain(&self, domain: &str) -> Vec<MatchRule> {
        let mut rules: Vec<MatchRule> = self
            .rules
            .read()
            .expect("rules lock poisoned")
            .iter()
            .filter(|r| r.applies_to(domain))
            .cloned()
            .collect();
        // stable: equal priorities keep insertion order
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority_or(self.default_priority)));
        rules
    }

    fn list_learned_mappings(&self, domain: &str) -> Vec<LearnedMapping> {
        self.learned
            .read()
            .expect("learned lock poisoned")
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    fn profile(&self) -> HashMap<String, String> {
        self.profile.read().expect("profile lock poisoned").clone()
    }

    fn answers(&self) -> HashMap<String, String> {
        self.answers.read().expect("answers lock poisoned").clone()
    }
}

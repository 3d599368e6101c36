//! YAML/JSON schema types with serde deserialization.
//!
//! Defines the rule type hierarchy:
//! - `MatchRuleDocument`: a rule file (apiVersion, kind, metadata, spec)
//! - `MatchRule`: site pattern, priority, and ordered field matchers
//! - `FieldMatcher`: match criteria plus a `ValueSource`
//! - `LearnedMapping`: user-taught selector overrides

mod learned;
mod matcher;
mod metadata;
mod rule;

pub use learned::*;
pub use matcher::*;
pub use metadata::*;
pub use rule::*;

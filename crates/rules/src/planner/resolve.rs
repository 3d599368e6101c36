//! Turning a [`ValueSource`] into a concrete string.

use serde_json::{Map, Value};
use tracing::warn;

use crate::context::MatchingContext;
use crate::schema::ValueSource;

use super::password::generate_password;

/// Functions a `function` value source may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    GeneratePassword,
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "generate_password" => Some(BuiltinFunction::GeneratePassword),
            _ => None,
        }
    }

    pub fn call(self, params: &Map<String, Value>, default_length: usize) -> String {
        match self {
            BuiltinFunction::GeneratePassword => {
                let length = params
                    .get("length")
                    .and_then(Value::as_u64)
                    .filter(|n| *n > 0)
                    .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                    .unwrap_or(default_length);
                generate_password(length)
            }
        }
    }
}

/// Resolve `source` against `ctx`. Missing or empty values yield `None`.
pub fn resolve_value(
    source: &ValueSource,
    ctx: &MatchingContext,
    default_password_length: usize,
) -> Option<String> {
    let value = match source {
        ValueSource::Profile { key } => ctx.profile_value(key).map(str::to_string),
        ValueSource::Answer { key } => ctx.answer_value(key).map(str::to_string),
        ValueSource::Constant { value } => Some(value.clone()),
        ValueSource::Function { name, params } => match BuiltinFunction::from_name(name) {
            Some(f) => Some(f.call(params, default_password_length)),
            None => {
                warn!(function = %name, "unknown value function");
                None
            }
        },
    };
    value.filter(|v| !v.is_empty())
}

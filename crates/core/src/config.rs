use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed) {
            return Some(v);
        }
    }
    lookup(key)
}

fn profiled_or<F>(lookup: &F, profile: &str, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    profiled_opt(lookup, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_parse<F, T>(lookup: &F, profile: &str, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match profiled_opt(lookup, profile, key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "unparseable config value, using default");
                default
            }
        },
        None => default,
    }
}

/// Like [`profiled_parse`] for floats, rejecting NaN and infinities.
fn profiled_finite<F>(lookup: &F, profile: &str, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let value = profiled_parse(lookup, profile, key, default);
    if value.is_finite() {
        value
    } else {
        tracing::warn!(key, value, "unparseable config value, using default");
        default
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub detection: DetectionConfig,
    pub planner: PlannerConfig,
    pub rules: RulesConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `AUTOFILL_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("AUTOFILL_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, env_opt)
    }

    /// Build config from an arbitrary key lookup. `from_env` is this with
    /// the process environment.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            detection: DetectionConfig::from_lookup(&lookup, p),
            planner: PlannerConfig::from_lookup(&lookup, p),
            rules: RulesConfig::from_lookup(&lookup, p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  detection:   min_fillable={}, observe_interval_ms={}",
            self.detection.minimum_threshold,
            self.detection
                .observe_interval_ms
                .map(|ms| ms.to_string())
                .unwrap_or_else(|| "(off)".to_string())
        );
        tracing::info!(
            "  planner:     threshold={}, rule_priority={}, generic_priority={}, password_len={}",
            self.planner.confidence_threshold,
            self.planner.default_rule_priority,
            self.planner.generic_priority,
            self.planner.password_length
        );
        tracing::info!("  rules:       dir={}", self.rules.rules_dir.display());
    }
}

// ── Detection ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Fillable fields required for the field-mass signal to pass.
    pub minimum_threshold: usize,
    /// Observer tick interval; `None` disables ticks.
    pub observe_interval_ms: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            minimum_threshold: 2,
            observe_interval_ms: None,
        }
    }
}

impl DetectionConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F, p: &str) -> Self {
        let d = Self::default();
        Self {
            minimum_threshold: profiled_parse(lookup, p, "DETECT_MIN_FILLABLE", d.minimum_threshold),
            observe_interval_ms: profiled_opt(lookup, p, "DETECT_OBSERVE_INTERVAL_MS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms: &u64| *ms > 0),
        }
    }
}

// ── Planner ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Minimum priority-weighted matcher score for a field to be filled.
    pub confidence_threshold: f64,
    /// Priority applied to rules that do not declare one.
    pub default_rule_priority: i64,
    /// Priority of the built-in generic matchers.
    pub generic_priority: i64,
    /// Length used by `generate_password` when the rule gives none.
    pub password_length: usize,
    /// Identifier stamped on every plan.
    pub form_id: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            default_rule_priority: 100,
            generic_priority: 10,
            password_length: 20,
            form_id: "auto-1".to_string(),
        }
    }
}

impl PlannerConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F, p: &str) -> Self {
        let d = Self::default();
        Self {
            confidence_threshold: profiled_finite(
                lookup,
                p,
                "PLAN_CONFIDENCE_THRESHOLD",
                d.confidence_threshold,
            ),
            default_rule_priority: profiled_parse(
                lookup,
                p,
                "PLAN_DEFAULT_RULE_PRIORITY",
                d.default_rule_priority,
            ),
            generic_priority: profiled_parse(lookup, p, "PLAN_GENERIC_PRIORITY", d.generic_priority),
            password_length: profiled_parse(lookup, p, "PLAN_PASSWORD_LENGTH", d.password_length),
            form_id: profiled_or(lookup, p, "PLAN_FORM_ID", &d.form_id),
        }
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rules_dir: PathBuf,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("data/rules"),
        }
    }
}

impl RulesConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F, p: &str) -> Self {
        Self {
            rules_dir: PathBuf::from(profiled_or(lookup, p, "RULES_DIR", "data/rules")),
        }
    }
}

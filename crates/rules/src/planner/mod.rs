//! Fill-plan synthesis.
//!
//! For each field, in page order:
//! 1. a learned mapping for the exact selector wins if it resolves to a value;
//! 2. otherwise the best-scoring matcher across site rules, wildcard rules,
//!    and generic matchers is chosen (see [`scoring`]);
//! 3. the value is resolved, with confirm-password fields reusing the
//!    password generated earlier in the same plan and file fields falling
//!    back to a placeholder file name;
//! 4. fields below the confidence threshold or without a value are reported
//!    as unknown.
//!
//! Planning never fails: malformed patterns and unknown functions degrade
//! to "no match" for the affected matcher.

pub mod generic;
pub mod password;
pub mod resolve;
pub mod scoring;


use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use autofill_core::config::PlannerConfig;
use autofill_core::{web, FieldFeature, PlanRequest};

use crate::context::MatchingContext;
use crate::repository::RuleRepository;

use generic::{default_file_name, generic_matchers, CONFIRM_PASSWORD_KEY, PASSWORD_KEY};
use resolve::resolve_value;
use scoring::{best_match, CompiledMatcher};

pub use password::generate_password;

// ── Plan types ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillAction {
    SetValue,
    SetFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillStep {
    pub selector: String,
    pub action: FillAction,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownReason {
    LowConfidenceOrNoValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownField {
    pub selector: String,
    pub reason: UnknownReason,
}

/// Result of planning one page. Every input field lands in exactly one of
/// `steps` or `unknown_fields`, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPlan {
    pub form_id: String,
    pub steps: Vec<FillStep>,
    pub unknown_fields: Vec<UnknownField>,
    /// Hostname of the request URL; empty when it does not parse.
    pub domain: String,
}

impl FillPlan {
    pub fn step_for(&self, selector: &str) -> Option<&FillStep> {
        self.steps.iter().find(|s| s.selector == selector)
    }
}

// ── Planner ───────────────────────────────────────────────────

/// Carried across fields while folding over the request.
#[derive(Default)]
struct PlanState {
    steps: Vec<FillStep>,
    unknown_fields: Vec<UnknownField>,
    generated_password: Option<String>,
}

impl PlanState {
    fn fill(mut self, field: &FieldFeature, value: String) -> Self {
        let action = if field.is_file() {
            FillAction::SetFile
        } else {
            FillAction::SetValue
        };
        self.steps.push(FillStep {
            selector: field.selector.clone(),
            action,
            value,
        });
        self
    }

    fn unknown(mut self, field: &FieldFeature) -> Self {
        self.unknown_fields.push(UnknownField {
            selector: field.selector.clone(),
            reason: UnknownReason::LowConfidenceOrNoValue,
        });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FillPlanner {
    config: PlannerConfig,
}

impl FillPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Rule matchers in context order, then the generic fallbacks. Order
    /// matters only for ties.
    fn compile_matchers(&self, ctx: &MatchingContext) -> Vec<CompiledMatcher> {
        let rule_matchers = ctx.rules.iter().flat_map(|rule| {
            let priority = rule.priority_or(self.config.default_rule_priority);
            rule.field_matchers
                .iter()
                .map(move |m| CompiledMatcher::compile(m, priority))
        });
        let fallback = generic_matchers(self.config.password_length);
        let fallback_matchers = fallback
            .iter()
            .map(|m| CompiledMatcher::compile(m, self.config.generic_priority));
        rule_matchers.chain(fallback_matchers).collect()
    }

    pub fn create_fill_plan(&self, request: &PlanRequest, ctx: &MatchingContext) -> FillPlan {
        let domain = web::hostname(&request.url).unwrap_or_else(|| {
            warn!(url = %request.url, "plan request URL has no hostname");
            String::new()
        });
        let matchers = self.compile_matchers(ctx);

        let state = request
            .fields
            .iter()
            .fold(PlanState::default(), |state, field| {
                self.plan_field(state, field, &matchers, ctx)
            });

        info!(
            domain = %domain,
            steps = state.steps.len(),
            unknown = state.unknown_fields.len(),
            "fill plan created"
        );
        FillPlan {
            form_id: self.config.form_id.clone(),
            steps: state.steps,
            unknown_fields: state.unknown_fields,
            domain,
        }
    }

    fn plan_field(
        &self,
        mut state: PlanState,
        field: &FieldFeature,
        matchers: &[CompiledMatcher],
        ctx: &MatchingContext,
    ) -> PlanState {
        if let Some(mapping) = ctx.learned_mappings.get(&field.selector) {
            let learned = ctx
                .profile_value(&mapping.field_key)
                .or_else(|| ctx.answer_value(&mapping.field_key));
            if let Some(value) = learned {
                debug!(selector = %field.selector, field_key = %mapping.field_key, "learned mapping");
                return state.fill(field, value.to_string());
            }
        }

        let Some((best, score)) = best_match(matchers, field) else {
            debug!(selector = %field.selector, "no matcher scored");
            return state.unknown(field);
        };
        if score < self.config.confidence_threshold {
            debug!(selector = %field.selector, field_key = %best.field_key, score, "below threshold");
            return state.unknown(field);
        }

        let mut value = resolve_value(&best.value_source, ctx, self.config.password_length);
        if best.field_key == PASSWORD_KEY {
            if let Some(pw) = &value {
                state.generated_password = Some(pw.clone());
            }
        }
        if best.field_key == CONFIRM_PASSWORD_KEY && state.generated_password.is_some() {
            value = state.generated_password.clone();
        }
        if value.is_none() && field.is_file() {
            value = default_file_name(&best.field_key).map(str::to_string);
        }

        debug!(selector = %field.selector, field_key = %best.field_key, score, resolved = value.is_some(), "matched");
        match value {
            Some(v) => state.fill(field, v),
            None => state.unknown(field),
        }
    }

    /// Build the context for the request's domain from `repo`, then plan.
    pub fn plan_for_page<R: RuleRepository + ?Sized>(
        &self,
        repo: &R,
        request: &PlanRequest,
    ) -> FillPlan {
        let domain = web::hostname(&request.url).unwrap_or_default();
        let ctx = MatchingContext::from_repository(repo, &domain);
        self.create_fill_plan(request, &ctx)
    }
}

/// Plan with default settings.
pub fn create_fill_plan(request: &PlanRequest, ctx: &MatchingContext) -> FillPlan {
    FillPlanner::default().create_fill_plan(request, ctx)
}

/// [`FillPlanner::plan_for_page`] with default settings.
pub fn plan_for_page<R: RuleRepository + ?Sized>(repo: &R, request: &PlanRequest) -> FillPlan {
    FillPlanner::default().plan_for_page(repo, request)
}

//! Match rules and fill-plan synthesis.
//!
//! This crate provides:
//! - YAML `MatchRule` documents with serde deserialization
//! - A filesystem loader for rule directories
//! - The [`RuleRepository`] collaborator contract and an in-memory store
//! - The fill planner: learned mappings, priority-weighted matcher scoring,
//!   value resolution, and generated-password carry-over

pub mod context;
pub mod loader;
pub mod planner;
pub mod repository;
pub mod schema;

pub use context::{LearnedMappings, MatchingContext};
pub use loader::{LoadResult, LoadStatus, RuleError, RuleLoader};
pub use planner::{
    create_fill_plan, generate_password, plan_for_page, FillAction, FillPlan, FillPlanner,
    FillStep, UnknownField, UnknownReason,
};
pub use repository::{InMemoryRepository, RuleRepository};

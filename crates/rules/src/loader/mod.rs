//! Filesystem rule loader.
//!
//! Scans the rules directory for `MatchRule` YAML documents and keeps them
//! in memory keyed by `metadata.id`.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};

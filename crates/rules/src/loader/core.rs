//! Core [`RuleLoader`] struct: filesystem-backed match rule loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::schema::{MatchRule, MatchRuleDocument, MATCH_RULE_KIND};

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// A loaded document and the file it came from.
#[derive(Debug, Clone)]
struct LoadedRule {
    path: PathBuf,
    document: MatchRuleDocument,
}

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, deserializes
/// them into [`MatchRuleDocument`]s, and keeps an in-memory map keyed by
/// `metadata.id`.
pub struct RuleLoader {
    rules_dir: PathBuf,
    documents: Arc<RwLock<HashMap<String, LoadedRule>>>,
    /// Priority used to order rules that do not declare one.
    default_priority: i64,
}

impl RuleLoader {
    /// Create a new loader for the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist.
    pub fn new(rules_dir: PathBuf) -> Self {
        if !rules_dir.exists() {
            if let Err(e) = fs::create_dir_all(&rules_dir) {
                warn!(path = %rules_dir.display(), error = %e, "failed to create rules directory");
            }
        }
        Self {
            rules_dir,
            documents: Arc::new(RwLock::new(HashMap::new())),
            default_priority: 100,
        }
    }

    pub fn with_default_priority(mut self, default_priority: i64) -> Self {
        self.default_priority = default_priority;
        self
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse and validation errors
    /// are reported per file and do not abort the scan.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        self.scan_dir_recursive(&self.rules_dir, &mut results)?;
        let loaded = results.iter().filter(|r| r.is_loaded()).count();
        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(path = %self.rules_dir.display(), loaded, failed, "rules directory scanned");
        Ok(results)
    }

    fn scan_dir_recursive(&self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut entries = match fs::read_dir(dir) {
            Ok(e) => e.collect::<std::io::Result<Vec<_>>>()?,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };
        // deterministic duplicate-id resolution
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            if !is_yaml(&path) {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let status = match self.load_file(&path).and_then(|doc| self.insert(&path, doc)) {
                Ok(rule_id) => {
                    info!(rule_id = %rule_id, path = %path.display(), "loaded rule");
                    LoadStatus::Loaded { rule_id }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    LoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.push(LoadResult { path, status });
        }

        Ok(())
    }

    /// Parse and validate a single YAML rule file without storing it.
    pub fn load_file(&self, path: &Path) -> Result<MatchRuleDocument> {
        let contents = fs::read_to_string(path)?;
        let doc: MatchRuleDocument = serde_yaml::from_str(&contents)?;
        validate(&doc)?;
        Ok(doc)
    }

    /// Store `doc` as loaded from `path`. An id already claimed by a
    /// different file is rejected.
    fn insert(&self, path: &Path, doc: MatchRuleDocument) -> Result<String> {
        let id = doc.metadata.id.clone();
        let mut documents = self.documents.write().expect("documents lock poisoned");
        check_unclaimed(&documents, &id, path)?;
        documents.insert(
            id.clone(),
            LoadedRule {
                path: path.to_path_buf(),
                document: doc,
            },
        );
        Ok(id)
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    pub fn document(&self, id: &str) -> Option<MatchRuleDocument> {
        self.documents
            .read()
            .expect("documents lock poisoned")
            .get(id)
            .map(|l| l.document.clone())
    }

    /// All loaded documents, including disabled ones, sorted by id.
    pub fn documents(&self) -> Vec<MatchRuleDocument> {
        let mut docs: Vec<MatchRuleDocument> = self
            .documents
            .read()
            .expect("documents lock poisoned")
            .values()
            .map(|l| l.document.clone())
            .collect();
        docs.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
        docs
    }

    /// Enabled rules, highest priority first, ties by id.
    pub fn rules(&self) -> Vec<MatchRule> {
        let mut rules: Vec<MatchRule> = self
            .documents()
            .iter()
            .filter(|d| d.metadata.enabled)
            .map(MatchRuleDocument::rule)
            .collect();
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority_or(self.default_priority)));
        rules
    }

    /// Enabled rules that apply to `domain`, including wildcard rules.
    pub fn rules_for_domain(&self, domain: &str) -> Vec<MatchRule> {
        self.rules()
            .into_iter()
            .filter(|r| r.applies_to(domain))
            .collect()
    }

    /// Atomically write a rule document to `<id>.yml`.
    ///
    /// Writes to a `.tmp` file first, then renames to the final path to
    /// avoid partial writes on crash.
    pub fn write_document(&self, doc: &MatchRuleDocument) -> Result<PathBuf> {
        validate(doc)?;
        let id = &doc.metadata.id;
        let final_path = self.rules_dir.join(format!("{}.yml", id));
        let tmp_path = self.rules_dir.join(format!(".{}.tmp", id));
        check_unclaimed(
            &self.documents.read().expect("documents lock poisoned"),
            id,
            &final_path,
        )?;

        let yaml = doc.to_yaml()?;
        fs::write(&tmp_path, yaml)?;
        fs::rename(&tmp_path, &final_path)?;

        info!(rule_id = %id, path = %final_path.display(), "wrote rule file");
        self.insert(&final_path, doc.clone())?;
        Ok(final_path)
    }

    /// Delete a rule's file and forget it.
    pub fn delete_rule(&self, id: &str) -> Result<()> {
        let path = self
            .documents
            .read()
            .expect("documents lock poisoned")
            .get(id)
            .map(|l| l.path.clone())
            .ok_or_else(|| RuleError::Validation(format!("no rule loaded with id '{}'", id)))?;

        fs::remove_file(&path)?;
        self.documents
            .write()
            .expect("documents lock poisoned")
            .remove(id);

        info!(rule_id = %id, path = %path.display(), "deleted rule");
        Ok(())
    }
}

fn check_unclaimed(documents: &HashMap<String, LoadedRule>, id: &str, path: &Path) -> Result<()> {
    match documents.get(id) {
        Some(existing) if existing.path != path => Err(RuleError::Validation(format!(
            "duplicate rule id '{}' (already loaded from {})",
            id,
            existing.path.display()
        ))),
        _ => Ok(()),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}

fn validate(doc: &MatchRuleDocument) -> Result<()> {
    if doc.kind != MATCH_RULE_KIND {
        return Err(RuleError::Validation(format!(
            "unsupported kind '{}', expected '{}'",
            doc.kind, MATCH_RULE_KIND
        )));
    }
    let id = doc.metadata.id.trim();
    if id.is_empty() {
        return Err(RuleError::Validation(
            "rule metadata.id must not be empty".to_string(),
        ));
    }
    if doc.spec.site_pattern.trim().is_empty() {
        return Err(RuleError::Validation(format!(
            "rule '{}': site_pattern must not be empty",
            id
        )));
    }
    if let Some(i) = doc
        .spec
        .field_matchers
        .iter()
        .position(|m| m.field_key.trim().is_empty())
    {
        return Err(RuleError::Validation(format!(
            "rule '{}': field_matchers[{}].field_key must not be empty",
            id, i
        )));
    }
    Ok(())
}

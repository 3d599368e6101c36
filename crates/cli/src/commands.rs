//! Subcommand handlers. Each returns the JSON document to print.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

use autofill_core::{web, Config, PageSnapshot, PlanRequest};
use autofill_detect::FormDetector;
use autofill_rules::schema::LearnedMapping;
use autofill_rules::{generate_password, FillPlanner, InMemoryRepository, LoadStatus, RuleLoader};

fn open_input(input: &str) -> Result<Box<dyn io::Read>> {
    if input == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(input).with_context(|| format!("failed to open input '{}'", input))?;
    Ok(Box::new(file))
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn detect(config: &Config, input: &str) -> Result<Value> {
    let page = PageSnapshot::from_reader(open_input(input)?).context("invalid page snapshot")?;
    let detector = FormDetector::from_config(&config.detection);
    let result = detector.analyze_page(&page);
    info!(url = %page.url, detected = result.is_form_detected(), "detection complete");
    Ok(json!({
        "ok": true,
        "detected": result.is_form_detected(),
        "score": result.score(),
        "confidence": result.confidence(),
        "details": result,
    }))
}

pub struct PlanArgs<'a> {
    pub input: &'a str,
    pub profile: Option<&'a Path>,
    pub answers: Option<&'a Path>,
    pub learned: Option<&'a Path>,
    pub rules_dir: Option<&'a Path>,
}

pub fn plan(config: &Config, args: PlanArgs<'_>) -> Result<Value> {
    let request = PlanRequest::from_reader(open_input(args.input)?).context("invalid plan request")?;
    let repo = InMemoryRepository::with_default_priority(config.planner.default_rule_priority);

    let rules_dir = resolve_rules_dir(config, args.rules_dir);
    if rules_dir.is_dir() {
        let loader = open_loader(config, &rules_dir)?;
        for rule in loader.rules() {
            repo.insert_rule(rule);
        }
    } else {
        warn!(path = %rules_dir.display(), "rules directory not found, using generic matchers only");
    }

    if let Some(path) = args.profile {
        repo.upsert_profile(read_json_file::<HashMap<String, String>>(path)?);
    }
    if let Some(path) = args.answers {
        repo.upsert_answers(read_json_file::<HashMap<String, String>>(path)?);
    }
    if let Some(path) = args.learned {
        let domain = web::hostname(&request.url).unwrap_or_default();
        for mapping in read_json_file::<Vec<LearnedMapping>>(path)? {
            repo.insert_learned_mapping(&domain, mapping);
        }
    }

    let plan = FillPlanner::new(config.planner.clone()).plan_for_page(&repo, &request);
    Ok(serde_json::to_value(plan)?)
}

pub fn rules(config: &Config, rules_dir: Option<&Path>, domain: Option<&str>) -> Result<Value> {
    let rules_dir = resolve_rules_dir(config, rules_dir);
    if !rules_dir.is_dir() {
        bail!("rules directory not found: {}", rules_dir.display());
    }
    let loader = RuleLoader::new(rules_dir).with_default_priority(config.planner.default_rule_priority);
    let results = loader.load_all().context("failed to scan rules directory")?;

    let failed: Vec<Value> = results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Failed { error } => Some(json!({ "path": r.path, "error": error })),
            _ => None,
        })
        .collect();
    let rules = match domain {
        Some(d) => serde_json::to_value(loader.rules_for_domain(d))?,
        None => serde_json::to_value(loader.documents())?,
    };
    Ok(json!({
        "loaded": results.iter().filter(|r| r.is_loaded()).count(),
        "failed": failed,
        "rules": rules,
    }))
}

pub fn password(config: &Config, length: Option<usize>) -> String {
    generate_password(length.unwrap_or(config.planner.password_length))
}

fn resolve_rules_dir(config: &Config, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| config.rules.rules_dir.clone())
}

fn open_loader(config: &Config, rules_dir: &Path) -> Result<RuleLoader> {
    let loader = RuleLoader::new(rules_dir.to_path_buf())
        .with_default_priority(config.planner.default_rule_priority);
    let results = loader.load_all().context("failed to scan rules directory")?;
    for r in results.iter().filter(|r| r.is_failed()) {
        warn!(path = %r.path.display(), "skipping rule file that failed to load");
    }
    Ok(loader)
}

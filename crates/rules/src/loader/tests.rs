//! Tests for the rule loader module.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::schema::{CommonMetadata, FieldMatcher, MatchRule, MatchRuleDocument, MatchSpec, ValueSource};

const VALID_RULE_YAML: &str = r#"
apiVersion: v1
kind: MatchRule
metadata:
  id: test-rule
  name: Test Rule
spec:
  site_pattern: jobs.example.com
  priority: 200
  field_matchers:
    - field_key: linkedin
      match:
        label_regex: "linked\\s*in"
      value_source:
        type: profile
        key: linkedin
"#;

const WILDCARD_RULE_YAML: &str = r#"
apiVersion: v1
kind: MatchRule
metadata:
  id: wildcard-city
  name: City anywhere
spec:
  site_pattern: "*"
  field_matchers:
    - field_key: city
      match:
        label_regex: "city|town"
      value_source:
        type: profile
        key: city
"#;

fn temp_loader() -> (TempDir, RuleLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = RuleLoader::new(dir.path().to_path_buf());
    (dir, loader)
}

fn loaded_ids(results: &[LoadResult]) -> Vec<&str> {
    results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Loaded { rule_id } => Some(rule_id.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn load_rule_from_file() {
    let (dir, loader) = temp_loader();
    let rule_path = dir.path().join("test-rule.yml");
    fs::write(&rule_path, VALID_RULE_YAML).unwrap();

    let doc = loader.load_file(&rule_path).unwrap();
    assert_eq!(doc.metadata.id, "test-rule");
    assert_eq!(doc.spec.site_pattern, "jobs.example.com");
    // load_file does not store
    assert!(loader.document("test-rule").is_none());
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("rule1.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule").unwrap();

    let results = loader.load_all().unwrap();

    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(loaded_ids(&results), vec!["test-rule"]);
    assert_eq!(skipped, 2);
    assert!(loader.document("test-rule").is_some());
}

#[test]
fn load_all_recursive_subdirectories() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("rule1.yml"), VALID_RULE_YAML).unwrap();
    let sub = dir.path().join("wildcards");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("city.yaml"), WILDCARD_RULE_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results).len(), 2);
    assert_eq!(loader.documents().len(), 2);
}

#[test]
fn load_all_on_missing_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let loader = RuleLoader::new(dir.path().join("nested").join("rules"));
    assert!(loader.rules_dir().exists(), "directory is created");
    assert!(loader.load_all().unwrap().is_empty());
}

#[test]
fn parse_error_is_reported_per_file() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("a-good.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join("b-bad.yml"), "kind: [unclosed").unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["test-rule"]);
    assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 1);
}

#[test]
fn unknown_value_source_fails_file() {
    let (dir, loader) = temp_loader();
    let yaml = VALID_RULE_YAML.replace("type: profile", "type: clipboard");
    let path = dir.path().join("bad.yml");
    fs::write(&path, yaml).unwrap();
    assert!(matches!(loader.load_file(&path), Err(RuleError::Parse(_))));
}

#[test]
fn validation_rejects_wrong_kind() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("wrong.yml");
    fs::write(&path, VALID_RULE_YAML.replace("kind: MatchRule", "kind: FormTemplate")).unwrap();
    let err = loader.load_file(&path).unwrap_err();
    assert!(matches!(err, RuleError::Validation(_)));
    assert!(err.to_string().contains("FormTemplate"));
}

#[test]
fn validation_rejects_empty_id_site_and_field_key() {
    let (dir, loader) = temp_loader();
    let cases = [
        VALID_RULE_YAML.replace("id: test-rule", "id: \"\""),
        VALID_RULE_YAML.replace("site_pattern: jobs.example.com", "site_pattern: \"  \""),
        VALID_RULE_YAML.replace("field_key: linkedin", "field_key: \"\""),
    ];
    for (i, yaml) in cases.iter().enumerate() {
        let path = dir.path().join(format!("case-{}.yml", i));
        fs::write(&path, yaml).unwrap();
        assert!(
            matches!(loader.load_file(&path), Err(RuleError::Validation(_))),
            "case {} should fail validation",
            i
        );
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("a.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join("b.yml"), VALID_RULE_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["test-rule"]);
    let failed = results.iter().find(|r| r.is_failed()).unwrap();
    assert!(failed.path.ends_with("b.yml"));
    match &failed.status {
        LoadStatus::Failed { error } => assert!(error.contains("duplicate")),
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn reload_of_same_file_is_not_a_duplicate() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("rule.yml"), VALID_RULE_YAML).unwrap();
    loader.load_all().unwrap();
    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["test-rule"]);
}

#[test]
fn rules_for_domain_filters_and_orders() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("site.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join("city.yml"), WILDCARD_RULE_YAML).unwrap();
    let other = VALID_RULE_YAML
        .replace("test-rule", "other-site")
        .replace("jobs.example.com", "shop.example.com");
    fs::write(dir.path().join("other.yml"), other).unwrap();
    loader.load_all().unwrap();

    let ids: Vec<String> = loader
        .rules_for_domain("jobs.example.com")
        .into_iter()
        .filter_map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["test-rule", "wildcard-city"]);
    assert_eq!(loader.rules().len(), 3);
}

#[test]
fn disabled_rules_are_loaded_but_not_offered() {
    let (dir, loader) = temp_loader();
    let disabled = VALID_RULE_YAML.replace("name: Test Rule", "name: Test Rule\n  enabled: false");
    fs::write(dir.path().join("rule.yml"), disabled).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["test-rule"]);
    assert_eq!(loader.documents().len(), 1);
    assert!(loader.rules().is_empty());
    assert!(loader.rules_for_domain("jobs.example.com").is_empty());
}

#[test]
fn default_priority_orders_undeclared_rules() {
    let (dir, loader) = temp_loader();
    let loader = loader.with_default_priority(500);
    fs::write(dir.path().join("site.yml"), VALID_RULE_YAML).unwrap();
    fs::write(dir.path().join("city.yml"), WILDCARD_RULE_YAML).unwrap();
    loader.load_all().unwrap();

    let first = loader.rules_for_domain("jobs.example.com").remove(0);
    assert_eq!(first.id.as_deref(), Some("wildcard-city"));
}

#[test]
fn write_document_is_atomic_and_loadable() {
    let (dir, loader) = temp_loader();
    let doc = MatchRuleDocument {
        api_version: "v1".to_string(),
        kind: "MatchRule".to_string(),
        metadata: CommonMetadata {
            id: "written".to_string(),
            name: "Written rule".to_string(),
            description: None,
            tags: None,
            enabled: true,
        },
        spec: MatchRule::new("*").with_matcher(FieldMatcher::new(
            "country",
            MatchSpec::label("country"),
            ValueSource::constant("United Kingdom"),
        )),
    };

    let path = loader.write_document(&doc).unwrap();
    assert_eq!(path, dir.path().join("written.yml"));
    assert!(!dir.path().join(".written.tmp").exists());
    assert_eq!(loader.document("written"), Some(doc.clone()));

    let fresh = RuleLoader::new(dir.path().to_path_buf());
    assert_eq!(loaded_ids(&fresh.load_all().unwrap()), vec!["written"]);
    assert_eq!(fresh.document("written"), Some(doc));
}

#[test]
fn write_document_rejects_id_owned_by_another_file() {
    let (dir, loader) = temp_loader();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("existing.yml"), VALID_RULE_YAML).unwrap();
    loader.load_all().unwrap();

    let doc = loader.document("test-rule").unwrap();
    let err = loader.write_document(&doc).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
    assert!(!dir.path().join("test-rule.yml").exists());
    assert!(!dir.path().join(".test-rule.tmp").exists());

    let results = loader.load_all().unwrap();
    assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 0);
}

#[test]
fn write_document_overwrites_its_own_file() {
    let (dir, loader) = temp_loader();
    fs::write(dir.path().join("test-rule.yml"), VALID_RULE_YAML).unwrap();
    loader.load_all().unwrap();

    let mut doc = loader.document("test-rule").unwrap();
    doc.spec.priority = Some(300);
    loader.write_document(&doc).unwrap();
    assert_eq!(loader.document("test-rule").unwrap().spec.priority, Some(300));
}

#[test]
fn zero_priority_sorts_as_default() {
    let (dir, loader) = temp_loader();
    let loader = loader.with_default_priority(500);
    let zero = VALID_RULE_YAML.replace("priority: 200", "priority: 0");
    fs::write(dir.path().join("site.yml"), zero).unwrap();
    let city = WILDCARD_RULE_YAML.replace("  field_matchers:", "  priority: 400\n  field_matchers:");
    fs::write(dir.path().join("city.yml"), city).unwrap();
    loader.load_all().unwrap();

    let ids: Vec<String> = loader
        .rules_for_domain("jobs.example.com")
        .into_iter()
        .filter_map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["test-rule", "wildcard-city"]);
}

#[test]
fn write_document_validates() {
    let (_dir, loader) = temp_loader();
    let doc = MatchRuleDocument {
        api_version: "v1".to_string(),
        kind: "MatchRule".to_string(),
        metadata: CommonMetadata {
            id: "".to_string(),
            name: "No id".to_string(),
            description: None,
            tags: None,
            enabled: true,
        },
        spec: MatchRule::new("*"),
    };
    assert!(matches!(loader.write_document(&doc), Err(RuleError::Validation(_))));
}

#[test]
fn delete_rule_removes_file_and_entry() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("rule.yml");
    fs::write(&path, VALID_RULE_YAML).unwrap();
    loader.load_all().unwrap();

    loader.delete_rule("test-rule").unwrap();
    assert!(!path.exists());
    assert!(loader.document("test-rule").is_none());
    assert!(matches!(loader.delete_rule("test-rule"), Err(RuleError::Validation(_))));
}

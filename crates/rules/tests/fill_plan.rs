//! End-to-end planning through the repository contract and example rules.

use std::collections::HashMap;

use autofill_core::{FieldFeature, PlanRequest};
use autofill_rules::planner::password::PASSWORD_CHARSET;
use autofill_rules::schema::LearnedMapping;
use autofill_rules::{
    create_fill_plan, plan_for_page, FillAction, InMemoryRepository, MatchingContext, RuleLoader,
};

fn examples_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/rules/examples")
}

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn repository_with_examples() -> InMemoryRepository {
    let loader = RuleLoader::new(examples_dir());
    loader.load_all().unwrap();
    let repo = InMemoryRepository::new();
    for rule in loader.rules() {
        repo.insert_rule(rule);
    }
    repo.upsert_profile(map(&[
        ("first_name", "Ada"),
        ("last_name", "Lovelace"),
        ("email", "ada@example.com"),
        ("linkedin", "https://linkedin.example/in/ada"),
        ("city", "London"),
    ]));
    repo.upsert_answers(map(&[("expected_salary", "90000")]));
    repo
}

#[test]
fn first_name_and_email_from_profile() {
    let ctx = MatchingContext::new().with_profile([("first_name", "Ada"), ("email", "a@x.io")]);
    let request = PlanRequest::new(
        "https://x.io/apply",
        vec![
            FieldFeature::new("#fn").with_type("text").with_label("First Name"),
            FieldFeature::new("#em").with_type("email").with_label("Email"),
        ],
    );

    let plan = create_fill_plan(&request, &ctx);
    assert_eq!(plan.domain, "x.io");
    assert_eq!(plan.form_id, "auto-1");
    let steps: Vec<(&str, FillAction, &str)> = plan
        .steps
        .iter()
        .map(|s| (s.selector.as_str(), s.action, s.value.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("#fn", FillAction::SetValue, "Ada"),
            ("#em", FillAction::SetValue, "a@x.io"),
        ]
    );
    assert!(plan.unknown_fields.is_empty());
}

#[test]
fn site_rules_and_wildcards_from_example_files() {
    let repo = repository_with_examples();
    let request = PlanRequest::new(
        "https://jobs.example.com/apply/42",
        vec![
            FieldFeature::new("#first").with_type("text").with_name("firstName").with_label("First name"),
            FieldFeature::new("#li").with_type("url").with_label("LinkedIn profile"),
            FieldFeature::new("#salary").with_type("text").with_name("salary_expectation").with_label("Expected salary"),
            FieldFeature::new("#ref").with_type("text").with_id("referral").with_label("How did you hear about us?"),
            FieldFeature::new("#city").with_type("text").with_name("city").with_label("City"),
            FieldFeature::new("#em").with_type("email").with_label("Email"),
            FieldFeature::new("#shoe").with_type("number").with_label("Shoe size"),
        ],
    );

    let plan = plan_for_page(&repo, &request);
    let value = |sel: &str| plan.step_for(sel).map(|s| s.value.as_str());

    assert_eq!(value("#first"), Some("Ada"));
    assert_eq!(value("#li"), Some("https://linkedin.example/in/ada"));
    assert_eq!(value("#salary"), Some("90000"));
    assert_eq!(value("#ref"), Some("Company website"));
    assert_eq!(value("#city"), Some("London"));
    // the disabled rule would have supplied a constant here
    assert_eq!(value("#em"), Some("ada@example.com"));
    assert_eq!(plan.unknown_fields.len(), 1);
    assert_eq!(plan.unknown_fields[0].selector, "#shoe");
}

#[test]
fn site_password_rule_sets_length_and_confirm_matches() {
    let repo = repository_with_examples();
    let request = PlanRequest::new(
        "https://accounts.example.org/signup",
        vec![
            FieldFeature::new("#pw")
                .with_type("password")
                .with_label("Password")
                .with_placeholder("Choose a password"),
            FieldFeature::new("#pw2").with_type("password").with_label("Verify"),
        ],
    );

    let plan = plan_for_page(&repo, &request);
    assert_eq!(plan.steps.len(), 2);
    let pw = &plan.steps[0].value;
    assert_eq!(pw.len(), 32);
    assert!(pw.chars().all(|c| PASSWORD_CHARSET.contains(c)));
    assert_eq!(&plan.steps[1].value, pw);
}

#[test]
fn learned_mapping_from_repository_takes_precedence() {
    let repo = repository_with_examples();
    repo.insert_learned_mapping("jobs.example.com", LearnedMapping::new("#odd", "city"));
    let request = PlanRequest::new(
        "https://jobs.example.com/apply",
        vec![FieldFeature::new("#odd").with_type("email").with_label("Email")],
    );

    let plan = plan_for_page(&repo, &request);
    assert_eq!(plan.steps[0].value, "London");

    // mappings are scoped to their domain
    let elsewhere = PlanRequest::new("https://other.example.com/", request.fields.clone());
    assert_eq!(plan_for_page(&repo, &elsewhere).steps[0].value, "ada@example.com");
}

#[test]
fn resume_upload_falls_back_to_display_name() {
    let request = PlanRequest::new(
        "https://jobs.example.com/apply",
        vec![FieldFeature::new("#cv").with_type("file").with_label("Upload your CV")],
    );
    let plan = create_fill_plan(&request, &MatchingContext::new());
    assert_eq!(plan.steps[0].action, FillAction::SetFile);
    assert_eq!(plan.steps[0].value, "resume.pdf");
}

#[test]
fn email_address_label_matches_generic_email() {
    let ctx = MatchingContext::new().with_profile([("email", "ada@example.com")]);
    let request = PlanRequest::new(
        "https://newsletter.example.com/",
        vec![FieldFeature::new("#mail").with_type("email").with_label("Email Address")],
    );
    let plan = create_fill_plan(&request, &ctx);
    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].action, FillAction::SetValue);
    assert_eq!(plan.steps[0].value, "ada@example.com");
}

#[test]
fn mistyped_attribute_still_plans_the_field() {
    let request = PlanRequest::from_json(
        r##"{
            "url": "https://jobs.example.com/apply",
            "fields": [
                { "selector": "#em", "type": "email", "label": "Email", "name": 42 },
                { "selector": "#x", "label": "Shoe size" }
            ]
        }"##,
    )
    .unwrap();
    let ctx = MatchingContext::new().with_profile([("email", "ada@example.com")]);
    let plan = create_fill_plan(&request, &ctx);
    assert_eq!(plan.step_for("#em").map(|s| s.value.as_str()), Some("ada@example.com"));
    assert_eq!(plan.unknown_fields.len(), 1);
    assert_eq!(plan.unknown_fields[0].selector, "#x");
}

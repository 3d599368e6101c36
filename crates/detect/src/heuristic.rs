//! Keyword heuristics over url, title, and content.
//!
//! Each scorer counts how many dictionary terms appear as case-insensitive
//! substrings of its input and saturates at `max(3, terms / 2)` hits.
//! Overlapping terms ("application" contains "apply") both count.

use serde::{Deserialize, Serialize};

use autofill_core::web;

pub const URL_KEYWORDS: &[&str] = &[
    "login", "signin", "signup", "register", "apply", "account", "checkout", "form",
];

pub const TITLE_KEYWORDS: &[&str] = &[
    "login",
    "sign in",
    "sign up",
    "register",
    "apply",
    "application",
    "checkout",
    "contact",
    "form",
];

pub const CONTENT_KEYWORDS: &[&str] = &[
    "email",
    "password",
    "first name",
    "last name",
    "address",
    "phone",
    "submit",
];

/// The three keyword lists the heuristics score against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDictionaries {
    pub url: Vec<String>,
    pub title: Vec<String>,
    pub content: Vec<String>,
}

impl Default for KeywordDictionaries {
    fn default() -> Self {
        Self::new(URL_KEYWORDS, TITLE_KEYWORDS, CONTENT_KEYWORDS)
    }
}

impl KeywordDictionaries {
    /// Build dictionaries from arbitrary term lists; terms are lower-cased.
    pub fn new<S: AsRef<str>>(url: &[S], title: &[S], content: &[S]) -> Self {
        fn lower<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
            terms.iter().map(|t| t.as_ref().to_lowercase()).collect()
        }
        Self {
            url: lower(url),
            title: lower(title),
            content: lower(content),
        }
    }

    /// Title terms followed by content terms, duplicates removed.
    pub fn combined(&self) -> Vec<String> {
        let mut union: Vec<String> = Vec::with_capacity(self.title.len() + self.content.len());
        for term in self.title.iter().chain(&self.content) {
            if !union.contains(term) {
                union.push(term.clone());
            }
        }
        union
    }
}

/// Fraction of `keywords` found in `text`, saturating at `max(3, n/2)` hits.
pub fn score_by_keywords(text: &str, keywords: &[String]) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let hits = keywords
        .iter()
        .filter(|kw| !kw.is_empty() && haystack.contains(kw.as_str()))
        .count();
    let denominator = f64::max(3.0, keywords.len() as f64 / 2.0);
    (hits as f64 / denominator).min(1.0)
}

/// Applies keyword heuristics over url, title, and content.
#[derive(Debug, Clone)]
pub struct HeuristicDetector {
    dictionaries: KeywordDictionaries,
    combined: Vec<String>,
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self::new(KeywordDictionaries::default())
    }
}

impl HeuristicDetector {
    pub fn new(dictionaries: KeywordDictionaries) -> Self {
        let combined = dictionaries.combined();
        Self {
            dictionaries,
            combined,
        }
    }

    pub fn dictionaries(&self) -> &KeywordDictionaries {
        &self.dictionaries
    }

    /// Score the URL path; the raw string is scored when it does not parse.
    pub fn analyze_url(&self, url: &str) -> f64 {
        if url.is_empty() {
            return 0.0;
        }
        match web::path(url) {
            Some(path) => score_by_keywords(&path, &self.dictionaries.url),
            None => score_by_keywords(url, &self.dictionaries.url),
        }
    }

    /// `0.6 * title + 0.4 * body`, each against its own dictionary.
    pub fn scan_page_content(&self, title: Option<&str>, content: Option<&str>) -> f64 {
        let title_score = score_by_keywords(title.unwrap_or(""), &self.dictionaries.title);
        let body_score = score_by_keywords(content.unwrap_or(""), &self.dictionaries.content);
        (title_score * 0.6 + body_score * 0.4).min(1.0)
    }

    /// Title and content together against the union of both dictionaries.
    pub fn check_keywords(&self, title: Option<&str>, content: Option<&str>) -> f64 {
        let combined = format!("{} {}", title.unwrap_or(""), content.unwrap_or(""));
        score_by_keywords(&combined, &self.combined)
    }
}

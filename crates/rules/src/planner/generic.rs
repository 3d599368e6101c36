//! Built-in fallback matchers applied on every site.

use serde_json::json;

use crate::schema::{FieldMatcher, MatchSpec, ValueSource};

/// Answer key the confirm-password matcher reads when no password was
/// generated earlier in the same plan.
pub const SAME_PASSWORD_ANSWER_KEY: &str = "__SAME_PASSWORD__";

pub const PASSWORD_KEY: &str = "password";
pub const CONFIRM_PASSWORD_KEY: &str = "confirm_password";
pub const RESUME_KEY: &str = "resume";
pub const COVER_LETTER_KEY: &str = "cover_letter";

/// Display name suggested for a file field nothing resolved a value for.
pub fn default_file_name(field_key: &str) -> Option<&'static str> {
    match field_key {
        RESUME_KEY => Some("resume.pdf"),
        COVER_LETTER_KEY => Some("cover_letter.pdf"),
        _ => None,
    }
}

/// Generic matchers, in the order they are tried.
pub fn generic_matchers(password_length: usize) -> Vec<FieldMatcher> {
    vec![
        FieldMatcher::new(
            "first_name",
            MatchSpec::label(r"first\s*name")
                .with_name("^first(Name)?$")
                .with_type("text"),
            ValueSource::profile("first_name"),
        ),
        FieldMatcher::new(
            "last_name",
            MatchSpec::label(r"last\s*name|surname")
                .with_name("^last(Name)?$")
                .with_type("text"),
            ValueSource::profile("last_name"),
        ),
        FieldMatcher::new(
            "full_name",
            MatchSpec::label(r"full\s*name").with_type("text"),
            ValueSource::profile("full_name"),
        ),
        FieldMatcher::new(
            "email",
            MatchSpec::label("email").with_type("email"),
            ValueSource::profile("email"),
        ),
        FieldMatcher::new(
            "phone",
            MatchSpec::label("phone|mobile|telephone").with_type("tel"),
            ValueSource::profile("phone"),
        ),
        FieldMatcher::new(
            PASSWORD_KEY,
            MatchSpec::label("password").with_type("password"),
            ValueSource::function("generate_password").with_param("length", json!(password_length)),
        ),
        FieldMatcher::new(
            CONFIRM_PASSWORD_KEY,
            MatchSpec::label(r"confirm|re[-\s]?enter|verify").with_type("password"),
            ValueSource::answer(SAME_PASSWORD_ANSWER_KEY),
        ),
        FieldMatcher::new(
            RESUME_KEY,
            MatchSpec::label("resume|cv").with_type("file"),
            ValueSource::answer("resume_filename"),
        ),
        FieldMatcher::new(
            COVER_LETTER_KEY,
            MatchSpec::label(r"cover\s*letter").with_type("file"),
            ValueSource::answer("cover_letter_filename"),
        ),
    ]
}

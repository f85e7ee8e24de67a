use regex::Regex;
use std::sync::LazyLock;

use super::types::{Field, FormState, ValidationErrors};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validate a required text field: error iff the trimmed value is empty.
pub fn validate_required(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{label} is required"));
    }
    None
}

/// Validate an email: required, then `local@domain.tld` with no whitespace.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Validate a LinkedIn profile URL. Only checks that "linkedin.com" appears
/// somewhere in the value.
pub fn validate_linkedin(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return Some("LinkedIn profile URL is required".to_string());
    }
    if !url.contains("linkedin.com") {
        return Some("Please enter a valid LinkedIn profile URL".to_string());
    }
    None
}

/// Validate a single field. `speakerImage` and `topics` ignore `value` and
/// read the form instead; without a form they report their error.
pub fn validate_field(field: Field, value: &str, form: Option<&FormState>) -> Option<String> {
    match field {
        Field::FirstName
        | Field::LastName
        | Field::JobTitle
        | Field::Biography
        | Field::Title
        | Field::Description => validate_required(value, field.label()),
        Field::Email => validate_email(value),
        Field::LinkedinProfile => validate_linkedin(value),
        Field::SpeakerImage => match form {
            Some(f) if f.has_image() => None,
            _ => Some("Profile image is required".to_string()),
        },
        Field::Topics => match form {
            Some(f) if !f.topics.is_empty() => None,
            _ => Some("Please select at least one topic".to_string()),
        },
        Field::GithubProfile | Field::TwitterHandle | Field::TalkLength | Field::TalkLevel => None,
    }
}

/// Run every validated field and keep only the ones that fail.
pub fn validate_form(form: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in Field::VALIDATED {
        let value = form.text(field).unwrap_or("");
        if let Some(message) = validate_field(field, value, Some(form)) {
            errors.insert(field, message);
        }
    }
    errors
}

pub fn has_errors(errors: &ValidationErrors) -> bool {
    errors.iter().next().is_some()
}

pub fn error_count(errors: &ValidationErrors) -> usize {
    errors.iter().count()
}

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write;

use super::types::{Field, FormState};

pub const EMAIL_SUBJECT: &str = "Talk proposal";

/// Plaintext mail body summarizing the form, for when the online
/// submission fails. Filled fields are listed in a fixed order, followed by
/// the required fields that are still empty.
pub fn email_body(form: &FormState) -> String {
    let mut body = String::new();
    let mut missing: Vec<&str> = Vec::new();

    body.push_str("Hello,\n\n");
    body.push_str("I would like to submit a talk proposal. Here are my details:\n\n");

    body.push_str("Speaker\n");
    required_line(&mut body, &mut missing, "First name", &form.first_name, Field::FirstName);
    required_line(&mut body, &mut missing, "Last name", &form.last_name, Field::LastName);
    required_line(&mut body, &mut missing, "Job title", &form.job_title, Field::JobTitle);
    required_line(&mut body, &mut missing, "Biography", &form.biography, Field::Biography);
    required_line(&mut body, &mut missing, "Email", &form.email, Field::Email);
    required_line(&mut body, &mut missing, "LinkedIn", &form.linkedin_profile, Field::LinkedinProfile);
    optional_line(&mut body, "GitHub", &form.github_profile);
    optional_line(&mut body, "Twitter", &form.twitter_handle);

    body.push_str("\nTalk\n");
    required_line(&mut body, &mut missing, "Title", &form.title, Field::Title);
    required_line(&mut body, &mut missing, "Description", &form.description, Field::Description);
    let _ = writeln!(body, "Length: {}", form.talk_length.label());
    let _ = writeln!(body, "Level: {}", form.talk_level.label());
    if form.topics.is_empty() {
        missing.push(missing_label(Field::Topics));
    } else {
        let _ = writeln!(body, "Topics: {}", form.topics.join(", "));
    }

    if form.has_image() {
        body.push_str("\nI will attach my profile image to this email.\n");
    } else {
        missing.push(missing_label(Field::SpeakerImage));
    }

    if !missing.is_empty() {
        body.push_str("\nMissing fields:\n");
        for label in &missing {
            let _ = writeln!(body, "- {label}");
        }
    }

    body.push_str("\nThanks!\n");
    body
}

/// `mailto:` URI carrying the fallback subject and body.
pub fn mailto_link(to: &str, form: &FormState) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        to,
        encode_component(EMAIL_SUBJECT),
        encode_component(&email_body(form))
    )
}

fn required_line(body: &mut String, missing: &mut Vec<&'static str>, label: &str, value: &str, field: Field) {
    let value = value.trim();
    if value.is_empty() {
        missing.push(missing_label(field));
    } else {
        let _ = writeln!(body, "{label}: {value}");
    }
}

fn optional_line(body: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        let _ = writeln!(body, "{label}: {value}");
    }
}

fn missing_label(field: Field) -> &'static str {
    match field {
        Field::FirstName => "First Name",
        Field::LastName => "Last Name",
        Field::JobTitle => "Job Title",
        Field::Biography => "Biography",
        Field::Email => "Email",
        Field::LinkedinProfile => "LinkedIn Profile",
        Field::Title => "Talk Title",
        Field::Description => "Talk Description",
        Field::Topics => "Topics",
        Field::SpeakerImage => "Profile Image",
        Field::GithubProfile => "GitHub Profile",
        Field::TwitterHandle => "Twitter Handle",
        Field::TalkLength => "Talk Length",
        Field::TalkLevel => "Talk Level",
    }
}

/// Everything outside the RFC 3986 unreserved set. Spaces become `%20`,
/// which mail clients expect in `mailto:` links.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

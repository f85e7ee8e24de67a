//! Validation engine tests: per-field rules, whole-form passes and the
//! sparse error map.

use std::sync::Arc;

use community_site::cfp::types::{Field, FormState, ImageFile, ValidationErrors};
use community_site::cfp::validate::{error_count, has_errors, validate_field, validate_form};

const REQUIRED_TEXT: [Field; 8] = [
    Field::FirstName,
    Field::LastName,
    Field::JobTitle,
    Field::Biography,
    Field::Email,
    Field::LinkedinProfile,
    Field::Title,
    Field::Description,
];

fn image() -> Arc<ImageFile> {
    Arc::new(ImageFile {
        file_name: "me.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        data: vec![1, 2, 3],
    })
}

#[test]
fn test_validate_field_is_pure() {
    let form = FormState::default();
    for field in Field::ALL {
        for value in ["", "   ", "x", "a@b.com", "linkedin.com/in/x"] {
            let first = validate_field(field, value, Some(&form));
            let second = validate_field(field, value, Some(&form));
            assert_eq!(first, second, "{field} gave different results for {value:?}");
        }
    }
}

#[test]
fn test_required_fields_reject_blank_values() {
    for field in REQUIRED_TEXT {
        for blank in ["", "   ", "\t\n"] {
            let message = validate_field(field, blank, None)
                .unwrap_or_else(|| panic!("{field} accepted {blank:?}"));
            assert!(!message.is_empty());
        }
    }
}

#[test]
fn test_required_message_names_the_field() {
    assert_eq!(validate_field(Field::FirstName, "", None).as_deref(), Some("First name is required"));
    assert_eq!(validate_field(Field::JobTitle, " ", None).as_deref(), Some("Job title is required"));
    assert_eq!(validate_field(Field::Title, "", None).as_deref(), Some("Title is required"));
}

#[test]
fn test_plain_required_fields_accept_any_text() {
    for field in [
        Field::FirstName,
        Field::LastName,
        Field::JobTitle,
        Field::Biography,
        Field::Title,
        Field::Description,
    ] {
        assert_eq!(validate_field(field, "  something  ", None), None, "{field} rejected text");
    }
}

#[test]
fn test_email_rules() {
    assert_eq!(validate_field(Field::Email, "a@b.com", None), None);
    assert_eq!(
        validate_field(Field::Email, "a@b", None).as_deref(),
        Some("Please enter a valid email address")
    );
    assert_eq!(validate_field(Field::Email, "", None).as_deref(), Some("Email is required"));
    assert_eq!(validate_field(Field::Email, "   ", None).as_deref(), Some("Email is required"));
}

#[test]
fn test_email_rejects_malformed_addresses() {
    for bad in ["ab.com", "a b@c.com", "a@b c.com", "@b.com", "a@.com", "a@b."] {
        assert_eq!(
            validate_field(Field::Email, bad, None).as_deref(),
            Some("Please enter a valid email address"),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn test_linkedin_is_a_substring_check() {
    assert_eq!(validate_field(Field::LinkedinProfile, "https://linkedin.com/in/x", None), None);
    // Weak on purpose: anything containing the domain passes.
    assert_eq!(
        validate_field(Field::LinkedinProfile, "https://example.com/linkedin.com-fake", None),
        None
    );
    assert_eq!(
        validate_field(Field::LinkedinProfile, "https://example.com/in/x", None).as_deref(),
        Some("Please enter a valid LinkedIn profile URL")
    );
    assert_eq!(
        validate_field(Field::LinkedinProfile, "", None).as_deref(),
        Some("LinkedIn profile URL is required")
    );
}

#[test]
fn test_topics_depend_on_form_context() {
    let mut form = FormState::default();
    assert_eq!(
        validate_field(Field::Topics, "", Some(&form)).as_deref(),
        Some("Please select at least one topic")
    );
    form.topics.push("React".to_string());
    assert_eq!(validate_field(Field::Topics, "", Some(&form)), None);
}

#[test]
fn test_speaker_image_depends_on_form_context() {
    let mut form = FormState::default();
    // The value argument is ignored for the image.
    assert_eq!(
        validate_field(Field::SpeakerImage, "me.jpg", Some(&form)).as_deref(),
        Some("Profile image is required")
    );
    form.speaker_image = Some(image());
    assert_eq!(validate_field(Field::SpeakerImage, "", Some(&form)), None);
}

#[test]
fn test_context_fields_without_context_report_errors() {
    assert!(validate_field(Field::SpeakerImage, "", None).is_some());
    assert!(validate_field(Field::Topics, "", None).is_some());
}

#[test]
fn test_optional_fields_are_never_validated() {
    for field in [Field::GithubProfile, Field::TwitterHandle, Field::TalkLength, Field::TalkLevel] {
        assert_eq!(validate_field(field, "", None), None);
        assert_eq!(validate_field(field, "???", None), None);
    }
}

#[test]
fn test_validate_form_on_empty_form_flags_every_required_field() {
    let errors = validate_form(&FormState::default());
    assert_eq!(error_count(&errors), 10);
    for field in Field::VALIDATED {
        assert!(errors.contains(field), "missing error for {field}");
    }
    assert!(!errors.contains(Field::GithubProfile));
    assert!(!errors.contains(Field::TwitterHandle));
}

#[test]
fn test_validate_form_is_sparse() {
    let form = FormState {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        job_title: "Engineer".to_string(),
        biography: "Bio".to_string(),
        email: "ada@example.com".to_string(),
        linkedin_profile: "linkedin.com/in/ada".to_string(),
        title: "Talk".to_string(),
        description: "About the talk".to_string(),
        speaker_image: Some(image()),
        topics: vec!["Testing".to_string()],
        ..FormState::default()
    };
    let errors = validate_form(&form);
    assert!(!has_errors(&errors));
    assert_eq!(errors, ValidationErrors::new());

    let form = FormState { email: "nope".to_string(), ..form };
    let errors = validate_form(&form);
    assert_eq!(error_count(&errors), 1);
    assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
}

#[test]
fn test_cleared_entries_do_not_count_as_errors() {
    let mut errors = ValidationErrors::new();
    errors.insert(Field::Email, "Email is required");
    errors.set(Field::Title, None);
    assert!(has_errors(&errors));
    assert_eq!(error_count(&errors), 1);

    assert!(errors.clear(Field::Email));
    assert!(!errors.clear(Field::Email));
    assert!(!has_errors(&errors));
    assert_eq!(error_count(&errors), 0);
    assert!(errors.to_wire_map().is_empty());
}

#[test]
fn test_field_names_round_trip_through_wire_names() {
    for field in Field::ALL {
        assert_eq!(field.as_str().parse::<Field>(), Ok(field));
    }
    assert!("favouriteColour".parse::<Field>().is_err());
}

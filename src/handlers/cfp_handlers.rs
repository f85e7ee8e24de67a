use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::SUBMIT_PATH;
use crate::cfp::controller::VALIDATION_FAILED_MESSAGE;
use crate::cfp::types::{Field, FormState, ImageFile, ValidationErrors, is_known_topic};
use crate::cfp::validate::{has_errors, validate_form};
use crate::config::AppConfig;
use crate::errors::{AppError, render, render_with_status};
use crate::models::submission::SubmissionArchive;
use crate::templates_structs::{CfpResultTemplate, CfpTemplate};

const ARCHIVE_FAILED_MESSAGE: &str =
    "We could not save your submission. Please try again or send it to us by email.";

/// Multipart body posted by the CFP form. Every part is optional here so
/// that missing values come back as field errors instead of a bare 400.
#[derive(Debug, MultipartForm)]
pub struct TalkUpload {
    #[multipart(rename = "firstName")]
    pub first_name: Option<Text<String>>,
    #[multipart(rename = "lastName")]
    pub last_name: Option<Text<String>>,
    #[multipart(rename = "jobTitle")]
    pub job_title: Option<Text<String>>,
    pub biography: Option<Text<String>>,
    pub email: Option<Text<String>>,
    #[multipart(rename = "linkedinProfile")]
    pub linkedin_profile: Option<Text<String>>,
    #[multipart(rename = "githubProfile")]
    pub github_profile: Option<Text<String>>,
    #[multipart(rename = "twitterHandle")]
    pub twitter_handle: Option<Text<String>>,
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    #[multipart(rename = "talkLength")]
    pub talk_length: Option<Text<String>>,
    #[multipart(rename = "talkLevel")]
    pub talk_level: Option<Text<String>>,
    /// JSON array of topic names, as sent by `HttpSubmitter`.
    pub topics: Option<Text<String>>,
    /// One part per ticked checkbox on the HTML form.
    pub topic: Vec<Text<String>>,
    #[multipart(rename = "speakerImage", limit = "5MB")]
    pub speaker_image: Option<Bytes>,
}

fn text(part: Option<Text<String>>) -> String {
    part.map(Text::into_inner).unwrap_or_default()
}

impl TalkUpload {
    /// Rebuild the form. Values that cannot be represented in `FormState`
    /// (bad choices, unknown topics, non-image uploads) are reported in the
    /// returned errors.
    pub fn into_form_state(self) -> (FormState, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let mut form = FormState {
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            job_title: text(self.job_title),
            biography: text(self.biography),
            email: text(self.email),
            linkedin_profile: text(self.linkedin_profile),
            github_profile: text(self.github_profile),
            twitter_handle: text(self.twitter_handle),
            title: text(self.title),
            description: text(self.description),
            ..FormState::default()
        };

        let talk_length = text(self.talk_length);
        if !talk_length.is_empty() {
            match talk_length.parse() {
                Ok(len) => form.talk_length = len,
                Err(_) => errors.insert(Field::TalkLength, "Please choose a valid talk length"),
            }
        }
        let talk_level = text(self.talk_level);
        if !talk_level.is_empty() {
            match talk_level.parse() {
                Ok(level) => form.talk_level = level,
                Err(_) => errors.insert(Field::TalkLevel, "Please choose a valid talk level"),
            }
        }

        let mut requested = Vec::new();
        let topics = text(self.topics);
        if !topics.trim().is_empty() {
            match serde_json::from_str::<Vec<String>>(&topics) {
                Ok(list) => requested.extend(list),
                Err(_) => errors.insert(Field::Topics, "Topics must be a JSON list of topic names"),
            }
        }
        requested.extend(self.topic.into_iter().map(Text::into_inner));

        let mut unknown = Vec::new();
        for topic in requested {
            if !is_known_topic(&topic) {
                unknown.push(topic);
            } else if !form.has_topic(&topic) {
                form.topics.push(topic);
            }
        }
        if !unknown.is_empty() {
            errors.insert(Field::Topics, format!("Unknown topic: {}", unknown.join(", ")));
        }

        if let Some(upload) = self.speaker_image.filter(|b| !b.data.is_empty()) {
            let content_type = upload
                .content_type
                .as_ref()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_default();
            if content_type.starts_with("image/") {
                form.speaker_image = Some(Arc::new(ImageFile {
                    file_name: upload.file_name.unwrap_or_else(|| "speaker-image".to_string()),
                    content_type,
                    data: upload.data.to_vec(),
                }));
            } else {
                errors.insert(Field::SpeakerImage, "Profile image must be an image file");
            }
        }

        (form, errors)
    }
}

pub async fn page(config: web::Data<AppConfig>) -> Result<HttpResponse, AppError> {
    render(CfpTemplate::new(&config, SUBMIT_PATH))
}

/// Browsers posting the plain HTML form get a page back; API clients get JSON.
fn wants_html(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

pub async fn submit(
    req: HttpRequest,
    config: web::Data<AppConfig>,
    archive: web::Data<SubmissionArchive>,
    MultipartForm(upload): MultipartForm<TalkUpload>,
) -> Result<HttpResponse, AppError> {
    let html = wants_html(&req);
    let (form, parse_errors) = upload.into_form_state();

    // Parse problems are more specific than "is required", so they win.
    let mut errors = validate_form(&form);
    errors.extend(parse_errors);

    if has_errors(&errors) {
        log::info!("Rejected CFP submission with {} field error(s)", errors.iter().count());
        if html {
            return render_with_status(
                StatusCode::BAD_REQUEST,
                CfpResultTemplate::rejected(&config, VALIDATION_FAILED_MESSAGE, &errors),
            );
        }
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": VALIDATION_FAILED_MESSAGE,
            "fields": errors.to_wire_map(),
        })));
    }

    match archive.store(&form) {
        Ok(record) => {
            log::info!("Accepted CFP submission {} ({:?})", record.id, record.title);
            if html {
                return render(CfpResultTemplate::accepted(&config, record.id));
            }
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "id": record.id,
            })))
        }
        Err(e) => {
            log::error!("Failed to archive CFP submission: {e}");
            if html {
                return render_with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CfpResultTemplate::rejected(&config, ARCHIVE_FAILED_MESSAGE, &ValidationErrors::new()),
                );
            }
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": ARCHIVE_FAILED_MESSAGE,
            })))
        }
    }
}

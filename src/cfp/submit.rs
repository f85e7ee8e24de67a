use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;

use super::types::{FormState, ImageFile};

pub const GENERIC_SUBMIT_ERROR: &str = "Failed to submit your talk proposal. Please try again.";

#[derive(Debug)]
pub enum SubmitError {
    /// The endpoint answered with a non-success status.
    Rejected { status: u16, message: String },
    Network(reqwest::Error),
    Payload(String),
}

impl SubmitError {
    /// The message to show on the form.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { message, .. } => message.clone(),
            SubmitError::Network(_) | SubmitError::Payload(_) => GENERIC_SUBMIT_ERROR.to_string(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Rejected { status, message } => {
                write!(f, "Submission rejected with status {}: {}", status, message)
            }
            SubmitError::Network(e) => write!(f, "Network error: {}", e),
            SubmitError::Payload(e) => write!(f, "Could not build submission: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// A serialized submission: every text part in wire order, plus the image.
#[derive(Debug, Clone)]
pub struct Submission {
    pub fields: Vec<(&'static str, String)>,
    pub speaker_image: Option<Arc<ImageFile>>,
}

impl Submission {
    pub fn from_form(form: &FormState) -> Self {
        let topics = serde_json::to_string(&form.topics).unwrap_or_else(|_| "[]".to_string());
        let fields = vec![
            ("name", form.full_name()),
            ("firstName", form.first_name.clone()),
            ("lastName", form.last_name.clone()),
            ("jobTitle", form.job_title.clone()),
            ("biography", form.biography.clone()),
            ("email", form.email.clone()),
            ("linkedinProfile", form.linkedin_profile.clone()),
            ("githubProfile", form.github_profile.clone()),
            ("twitterHandle", form.twitter_handle.clone()),
            ("title", form.title.clone()),
            ("description", form.description.clone()),
            ("talkLength", form.talk_length.as_str().to_string()),
            ("talkLevel", form.talk_level.as_str().to_string()),
            ("topics", topics),
        ];
        Self { fields, speaker_image: form.speaker_image.clone() }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_multipart(self) -> Result<Form, SubmitError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(image) = self.speaker_image {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|e| SubmitError::Payload(format!("bad image content type: {e}")))?;
            form = form.part("speakerImage", part);
        }
        Ok(form)
    }
}

/// Delivers a submission somewhere. Implementations never retry.
pub trait Submitter {
    fn submit(&self, submission: Submission) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Posts submissions as `multipart/form-data` to a fixed endpoint.
#[derive(Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }
}

impl Submitter for HttpSubmitter {
    async fn submit(&self, submission: Submission) -> Result<(), SubmitError> {
        let form = submission.into_multipart()?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(SubmitError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match response.json::<SubmitResponse>().await {
            Ok(SubmitResponse { error: Some(message) }) if !message.trim().is_empty() => message,
            _ => GENERIC_SUBMIT_ERROR.to_string(),
        };
        Err(SubmitError::Rejected { status: status.as_u16(), message })
    }
}

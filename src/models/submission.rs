use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cfp::types::FormState;
use crate::errors::AppError;
use crate::ids::random_hex;

/// An accepted talk proposal as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedSubmission {
    pub id: String,
    pub received_at: DateTime<Utc>,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub biography: String,
    pub email: String,
    pub linkedin_profile: String,
    pub github_profile: String,
    pub twitter_handle: String,
    pub title: String,
    pub description: String,
    pub talk_length: String,
    pub talk_level: String,
    pub topics: Vec<String>,
    /// File name of the stored image, relative to the archive directory.
    pub speaker_image: Option<String>,
}

/// Accepted submissions, one `<id>.json` per proposal plus its image.
pub struct SubmissionArchive {
    dir: PathBuf,
}

impl SubmissionArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a validated form to the archive. Returns the new submission id.
    pub fn store(&self, form: &FormState) -> Result<ArchivedSubmission, AppError> {
        fs::create_dir_all(&self.dir)?;
        let id = random_hex(16);

        let speaker_image = match &form.speaker_image {
            Some(image) => {
                let file_name = format!("{id}.{}", image_extension(&image.content_type));
                fs::write(self.dir.join(&file_name), &image.data)?;
                Some(file_name)
            }
            None => None,
        };

        let record = ArchivedSubmission {
            id: id.clone(),
            received_at: Utc::now(),
            name: form.full_name(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            job_title: form.job_title.trim().to_string(),
            biography: form.biography.trim().to_string(),
            email: form.email.trim().to_string(),
            linkedin_profile: form.linkedin_profile.trim().to_string(),
            github_profile: form.github_profile.trim().to_string(),
            twitter_handle: form.twitter_handle.trim().to_string(),
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            talk_length: form.talk_length.as_str().to_string(),
            talk_level: form.talk_level.as_str().to_string(),
            topics: form.topics.clone(),
            speaker_image,
        };

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(self.dir.join(format!("{id}.json")), json)?;
        Ok(record)
    }
}

fn image_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

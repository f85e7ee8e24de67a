use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::CfpError;
use super::preview::PreviewUrl;

/// Topics a speaker can pick from. Anything else is rejected on toggle.
pub const TOPICS: &[&str] = &[
    "React",
    "Next.js",
    "TypeScript",
    "JavaScript",
    "Node.js",
    "Web Performance",
    "Accessibility",
    "Testing",
    "Design Systems",
    "State Management",
    "Server Components",
    "Developer Tooling",
    "AI & Machine Learning",
    "Career & Community",
];

pub fn is_known_topic(topic: &str) -> bool {
    TOPICS.contains(&topic)
}

// ── Fields ────────────────────────────────────────────────────────

/// Every input on the CFP form, named by its wire (camelCase) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    JobTitle,
    Biography,
    Email,
    LinkedinProfile,
    GithubProfile,
    TwitterHandle,
    SpeakerImage,
    Title,
    Description,
    TalkLength,
    TalkLevel,
    Topics,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::FirstName,
        Field::LastName,
        Field::JobTitle,
        Field::Biography,
        Field::Email,
        Field::LinkedinProfile,
        Field::GithubProfile,
        Field::TwitterHandle,
        Field::SpeakerImage,
        Field::Title,
        Field::Description,
        Field::TalkLength,
        Field::TalkLevel,
        Field::Topics,
    ];

    /// Fields checked by a whole-form validation pass.
    /// GitHub and Twitter are optional and never validated.
    pub const VALIDATED: [Field; 10] = [
        Field::FirstName,
        Field::LastName,
        Field::JobTitle,
        Field::Biography,
        Field::Email,
        Field::LinkedinProfile,
        Field::Title,
        Field::Description,
        Field::SpeakerImage,
        Field::Topics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::JobTitle => "jobTitle",
            Field::Biography => "biography",
            Field::Email => "email",
            Field::LinkedinProfile => "linkedinProfile",
            Field::GithubProfile => "githubProfile",
            Field::TwitterHandle => "twitterHandle",
            Field::SpeakerImage => "speakerImage",
            Field::Title => "title",
            Field::Description => "description",
            Field::TalkLength => "talkLength",
            Field::TalkLevel => "talkLevel",
            Field::Topics => "topics",
        }
    }

    /// Human label used in "<label> is required" messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::JobTitle => "Job title",
            Field::Biography => "Biography",
            Field::Email => "Email",
            Field::LinkedinProfile => "LinkedIn profile URL",
            Field::GithubProfile => "GitHub profile",
            Field::TwitterHandle => "Twitter handle",
            Field::SpeakerImage => "Profile image",
            Field::Title => "Title",
            Field::Description => "Description",
            Field::TalkLength => "Talk length",
            Field::TalkLevel => "Talk level",
            Field::Topics => "Topics",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = CfpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CfpError::UnknownField(s.to_string()))
    }
}

// ── Talk choices ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TalkLength {
    #[serde(rename = "5")]
    Lightning,
    #[default]
    #[serde(rename = "25")]
    Standard,
    #[serde(rename = "35")]
    Long,
}

impl TalkLength {
    pub const ALL: [TalkLength; 3] = [TalkLength::Lightning, TalkLength::Standard, TalkLength::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            TalkLength::Lightning => "5",
            TalkLength::Standard => "25",
            TalkLength::Long => "35",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TalkLength::Lightning => "5 minutes (lightning talk)",
            TalkLength::Standard => "25 minutes",
            TalkLength::Long => "35 minutes",
        }
    }
}

impl FromStr for TalkLength {
    type Err = CfpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TalkLength::ALL
            .into_iter()
            .find(|len| len.as_str() == s)
            .ok_or_else(|| CfpError::InvalidChoice { field: Field::TalkLength, value: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TalkLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl TalkLevel {
    pub const ALL: [TalkLevel; 3] = [TalkLevel::Beginner, TalkLevel::Intermediate, TalkLevel::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            TalkLevel::Beginner => "beginner",
            TalkLevel::Intermediate => "intermediate",
            TalkLevel::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TalkLevel::Beginner => "Beginner",
            TalkLevel::Intermediate => "Intermediate",
            TalkLevel::Advanced => "Advanced",
        }
    }
}

impl FromStr for TalkLevel {
    type Err = CfpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TalkLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CfpError::InvalidChoice { field: Field::TalkLevel, value: s.to_string() })
    }
}

// ── Form state ────────────────────────────────────────────────────

/// A locally selected profile image. Never written to draft storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Where a submission is in its lifecycle. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

/// One in-progress CFP submission.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub biography: String,
    pub email: String,
    pub linkedin_profile: String,
    pub github_profile: String,
    pub twitter_handle: String,
    pub speaker_image: Option<Arc<ImageFile>>,
    /// Set by `FormController` together with `speaker_image`.
    pub image_preview: Option<PreviewUrl>,
    pub title: String,
    pub description: String,
    pub talk_length: TalkLength,
    pub talk_level: TalkLevel,
    /// Insertion-ordered, duplicate-free, drawn from `TOPICS`.
    pub topics: Vec<String>,
    pub lifecycle: Lifecycle,
    pub error: Option<String>,
}

impl FormState {
    /// The free-text value of `field`, or `None` for non-text fields.
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::JobTitle => &self.job_title,
            Field::Biography => &self.biography,
            Field::Email => &self.email,
            Field::LinkedinProfile => &self.linkedin_profile,
            Field::GithubProfile => &self.github_profile,
            Field::TwitterHandle => &self.twitter_handle,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::SpeakerImage | Field::TalkLength | Field::TalkLevel | Field::Topics => return None,
        };
        Some(value.as_str())
    }

    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let value = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::JobTitle => &mut self.job_title,
            Field::Biography => &mut self.biography,
            Field::Email => &mut self.email,
            Field::LinkedinProfile => &mut self.linkedin_profile,
            Field::GithubProfile => &mut self.github_profile,
            Field::TwitterHandle => &mut self.twitter_handle,
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::SpeakerImage | Field::TalkLength | Field::TalkLevel | Field::Topics => return None,
        };
        Some(value)
    }

    pub fn has_image(&self) -> bool {
        self.speaker_image.is_some()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    pub fn is_submitting(&self) -> bool {
        self.lifecycle == Lifecycle::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.lifecycle == Lifecycle::Submitted
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ── Validation errors ─────────────────────────────────────────────

/// Sparse field → message map. A key holding `None` counts as no error,
/// which is what a field-level clear leaves behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, Option<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, Some(message.into()));
    }

    pub fn set(&mut self, field: Field, message: Option<String>) {
        self.0.insert(field, message);
    }

    /// Blank out one field's error. Returns true if there was one.
    pub fn clear(&mut self, field: Field) -> bool {
        match self.0.get_mut(&field) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).and_then(|m| m.as_deref())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Only the entries that carry a message.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0
            .iter()
            .filter_map(|(field, message)| message.as_deref().map(|m| (*field, m)))
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            if message.is_some() || !self.0.contains_key(&field) {
                self.0.insert(field, message);
            }
        }
    }

    /// Wire-named map of the actual errors, for JSON responses.
    pub fn to_wire_map(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(field, message)| (field.as_str(), message.to_string()))
            .collect()
    }
}

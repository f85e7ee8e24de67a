use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::CfpError;
use super::drafts::{DraftStore, has_meaningful_data};
use super::email;
use super::preview::PreviewRegistry;
use super::submit::{Submission, Submitter};
use super::types::{Field, FormState, ImageFile, Lifecycle, ValidationErrors, is_known_topic};
use super::validate::{error_count, has_errors, validate_form};
use crate::events::EventSink;

pub const VALIDATION_FAILED_MESSAGE: &str = "Please fix the errors below before submitting.";

/// Owns one CFP form: its state, its field errors and its saved draft.
///
/// Edits only clear the touched field's error; errors are recomputed in full
/// on submit. Every edit to a persisted field schedules a draft save.
pub struct FormController {
    state: FormState,
    errors: ValidationErrors,
    drafts: DraftStore,
    previews: PreviewRegistry,
    events: Arc<dyn EventSink>,
    has_loaded_from_storage: bool,
}

impl FormController {
    /// Build a controller and hydrate it from the saved draft, if any.
    pub fn new(drafts: DraftStore, previews: PreviewRegistry, events: Arc<dyn EventSink>) -> Self {
        let mut controller = Self {
            state: FormState::default(),
            errors: ValidationErrors::new(),
            drafts,
            previews,
            events,
            has_loaded_from_storage: false,
        };
        controller.hydrate();
        controller
    }

    fn hydrate(&mut self) {
        if let Some(snapshot) = self.drafts.load() {
            snapshot.fields.apply_to(&mut self.state);
            self.drafts.set_last_saved(snapshot.last_saved);
            log::info!("Restored CFP draft saved at {:?}", snapshot.last_saved);
        }
        self.has_loaded_from_storage = true;
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn has_loaded_from_storage(&self) -> bool {
        self.has_loaded_from_storage
    }

    pub fn is_auto_saving(&self) -> bool {
        self.drafts.is_auto_saving()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.drafts.last_saved()
    }

    pub fn drafts_mut(&mut self) -> &mut DraftStore {
        &mut self.drafts
    }

    /// Assign a raw value to a text or choice field. Nothing is trimmed
    /// here; partial input like "jane@" is kept as typed.
    pub fn handle_input_change(&mut self, field: Field, value: impl Into<String>) -> Result<(), CfpError> {
        self.ensure_editable()?;
        let value = value.into();
        if let Some(slot) = self.state.text_mut(field) {
            *slot = value;
        } else {
            match field {
                Field::TalkLength => self.state.talk_length = value.parse()?,
                Field::TalkLevel => self.state.talk_level = value.parse()?,
                _ => return Err(CfpError::NotATextField(field)),
            }
        }
        self.errors.clear(field);
        self.persist();
        Ok(())
    }

    /// Toggle `topic` in the selection.
    pub fn handle_topic_change(&mut self, topic: &str) -> Result<(), CfpError> {
        self.ensure_editable()?;
        if !is_known_topic(topic) {
            return Err(CfpError::UnknownTopic(topic.to_string()));
        }
        match self.state.topics.iter().position(|t| t == topic) {
            Some(index) => {
                self.state.topics.remove(index);
            }
            None => self.state.topics.push(topic.to_string()),
        }
        if !self.state.topics.is_empty() {
            self.errors.clear(Field::Topics);
        }
        self.persist();
        Ok(())
    }

    /// Replace the profile image. The old preview is revoked and a new one
    /// is created for the new file. The image is never persisted.
    pub fn handle_image_change(&mut self, image: Option<ImageFile>) -> Result<(), CfpError> {
        self.ensure_editable()?;
        self.release_preview();
        self.state.speaker_image = None;
        if let Some(image) = image {
            let image = Arc::new(image);
            self.state.image_preview = Some(self.previews.create(Arc::clone(&image)));
            self.state.speaker_image = Some(image);
            self.errors.clear(Field::SpeakerImage);
        }
        Ok(())
    }

    pub fn clear_storage(&mut self) {
        self.drafts.clear();
        self.drafts.set_last_saved(None);
    }

    pub fn generate_email_body(&self) -> String {
        email::email_body(&self.state)
    }

    pub fn mailto_link(&self, to: &str) -> String {
        email::mailto_link(to, &self.state)
    }

    /// Offer the email fallback when a submission failed through no fault
    /// of the form's content.
    pub fn show_email_fallback(&self) -> bool {
        self.state.error.is_some() && !has_errors(&self.errors)
    }

    /// Recompute all field errors. Returns true if the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(&self.state);
        if has_errors(&self.errors) {
            self.state.error = Some(VALIDATION_FAILED_MESSAGE.to_string());
            self.events.track(
                "cfp_validation_failed",
                serde_json::json!({ "errorCount": error_count(&self.errors) }),
            );
            return false;
        }
        true
    }

    /// Validate and, if clean, hand the form to `submitter`. Returns true
    /// once the form reaches its terminal submitted state.
    pub async fn handle_submit<S: Submitter>(&mut self, submitter: &S) -> bool {
        if self.state.lifecycle != Lifecycle::Editing {
            return false;
        }
        if !self.validate() {
            return false;
        }

        self.state.lifecycle = Lifecycle::Submitting;
        self.state.error = None;
        let submission = Submission::from_form(&self.state);

        let outcome = {
            let mut in_flight = InFlight { lifecycle: &mut self.state.lifecycle, settled: false };
            let outcome = submitter.submit(submission).await;
            in_flight.settled = true;
            outcome
        };

        match outcome {
            Ok(()) => {
                self.clear_storage();
                self.state.lifecycle = Lifecycle::Submitted;
                log::info!("CFP submission accepted for {:?}", self.state.title);
                self.events.track(
                    "cfp_submitted",
                    serde_json::json!({
                        "talkLength": self.state.talk_length.as_str(),
                        "talkLevel": self.state.talk_level.as_str(),
                        "topics": self.state.topics,
                    }),
                );
                true
            }
            Err(e) => {
                log::warn!("CFP submission failed: {}", e);
                self.state.lifecycle = Lifecycle::Editing;
                self.state.error = Some(e.user_message());
                self.events.track("cfp_submit_failed", serde_json::json!({ "reason": e.to_string() }));
                false
            }
        }
    }

    /// Start over with an empty form, e.g. to submit another talk.
    pub fn reset(&mut self) {
        self.release_preview();
        self.clear_storage();
        self.state = FormState::default();
        self.errors = ValidationErrors::new();
    }

    fn ensure_editable(&self) -> Result<(), CfpError> {
        if self.state.is_submitted() {
            return Err(CfpError::ReadOnly);
        }
        Ok(())
    }

    fn persist(&mut self) {
        if !self.has_loaded_from_storage || self.state.is_submitted() {
            return;
        }
        if has_meaningful_data(&self.state) {
            self.drafts.save(&self.state);
        } else {
            self.drafts.clear();
        }
    }

    fn release_preview(&mut self) {
        if let Some(url) = self.state.image_preview.take() {
            self.previews.revoke(&url);
        }
    }
}

/// Puts the form back to `Editing` if a submit future is dropped before
/// the submitter answers, e.g. by a timeout.
struct InFlight<'a> {
    lifecycle: &'a mut Lifecycle,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled && *self.lifecycle == Lifecycle::Submitting {
            log::warn!("CFP submission abandoned before the endpoint answered");
            *self.lifecycle = Lifecycle::Editing;
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.release_preview();
    }
}

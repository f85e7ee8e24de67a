//! Draft persistence for the CFP form.
//!
//! The in-progress form (minus the image and lifecycle flags) is cached in a
//! `KeyValueStore` under a single key so it survives reloads. Writes are
//! debounced, and no storage failure ever reaches the caller: a corrupt or
//! unreadable entry is treated as if nothing had been saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::debounce::Debouncer;
use super::storage::{KeyValueStore, StoreError};
use super::types::{FormState, TalkLength, TalkLevel, is_known_topic};

pub const STORAGE_KEY: &str = "cfp-form-data";
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// The persisted subset of `FormState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftFields {
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
    pub talk_length: TalkLength,
    pub talk_level: TalkLevel,
    pub topics: Vec<String>,
}

impl DraftFields {
    pub fn from_form(form: &FormState) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            job_title: form.job_title.clone(),
            biography: form.biography.clone(),
            email: form.email.clone(),
            linkedin_profile: form.linkedin_profile.clone(),
            github_profile: form.github_profile.clone(),
            twitter_handle: form.twitter_handle.clone(),
            title: form.title.clone(),
            description: form.description.clone(),
            talk_length: form.talk_length,
            talk_level: form.talk_level,
            topics: form.topics.clone(),
        }
    }

    /// Copy the draft onto `form`. Topics outside the vocabulary and
    /// duplicates are dropped.
    pub fn apply_to(&self, form: &mut FormState) {
        form.first_name = self.first_name.clone();
        form.last_name = self.last_name.clone();
        form.job_title = self.job_title.clone();
        form.biography = self.biography.clone();
        form.email = self.email.clone();
        form.linkedin_profile = self.linkedin_profile.clone();
        form.github_profile = self.github_profile.clone();
        form.twitter_handle = self.twitter_handle.clone();
        form.title = self.title.clone();
        form.description = self.description.clone();
        form.talk_length = self.talk_length;
        form.talk_level = self.talk_level;
        form.topics.clear();
        for topic in &self.topics {
            if !is_known_topic(topic) {
                log::warn!("Dropping unknown topic {:?} from saved draft", topic);
                continue;
            }
            if !form.has_topic(topic) {
                form.topics.push(topic.clone());
            }
        }
    }
}

/// What actually lands in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    #[serde(flatten)]
    pub fields: DraftFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
}

/// Autosave indicator state, shared with the pending write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveStatus {
    pub is_auto_saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

/// True iff the form holds anything worth keeping: a non-blank text field,
/// a non-default talk length or level, or at least one topic.
pub fn has_meaningful_data(form: &FormState) -> bool {
    let any_text = [
        &form.first_name,
        &form.last_name,
        &form.job_title,
        &form.biography,
        &form.email,
        &form.linkedin_profile,
        &form.github_profile,
        &form.twitter_handle,
        &form.title,
        &form.description,
    ]
    .iter()
    .any(|value| !value.trim().is_empty());

    any_text
        || form.talk_length != TalkLength::default()
        || form.talk_level != TalkLevel::default()
        || !form.topics.is_empty()
}

pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    debouncer: Debouncer,
    status: Arc<Mutex<AutosaveStatus>>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_delay(store, AUTOSAVE_DELAY)
    }

    pub fn with_delay(store: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
            debouncer: Debouncer::new(delay),
            status: Arc::new(Mutex::new(AutosaveStatus::default())),
        }
    }

    /// Read the saved draft. Unreadable or corrupt entries are deleted.
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read saved CFP draft, discarding it: {}", e);
                self.discard();
                return None;
            }
        };
        match serde_json::from_str::<PersistedSnapshot>(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("Saved CFP draft is corrupt, discarding it: {}", e);
                self.discard();
                None
            }
        }
    }

    /// Schedule a write of `form`'s persistable fields. A later call within
    /// the debounce window replaces this one.
    pub fn save(&mut self, form: &FormState) {
        let fields = DraftFields::from_form(form);
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let status = Arc::clone(&self.status);
        self.debouncer.schedule(move || {
            write_snapshot(store.as_ref(), &key, fields, &status);
        });
    }

    /// Delete the saved draft and drop any pending write.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.discard();
    }

    /// Wait for a pending write to land.
    pub async fn flush(&mut self) {
        self.debouncer.flush().await;
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn status(&self) -> AutosaveStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_auto_saving(&self) -> bool {
        self.status().is_auto_saving
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.status().last_saved
    }

    pub fn set_last_saved(&self, at: Option<DateTime<Utc>>) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        status.last_saved = at;
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            log::warn!("Failed to remove saved CFP draft: {}", e);
        }
    }
}

fn write_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
    fields: DraftFields,
    status: &Mutex<AutosaveStatus>,
) {
    status.lock().unwrap_or_else(|e| e.into_inner()).is_auto_saving = true;

    let saved_at = Utc::now();
    let snapshot = PersistedSnapshot { fields, last_saved: Some(saved_at) };
    let result = serde_json::to_string(&snapshot)
        .map_err(StoreError::from)
        .and_then(|json| store.set(key, &json));

    let mut status = status.lock().unwrap_or_else(|e| e.into_inner());
    match result {
        Ok(()) => status.last_saved = Some(saved_at),
        Err(e) => log::error!("Failed to save CFP draft: {}", e),
    }
    status.is_auto_saving = false;
}

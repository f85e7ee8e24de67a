//! Shared test infrastructure for the CFP form tests.
//!
//! - `CountingStore` / `FailingStore` - key-value stores that record or refuse writes
//! - `RecordingSink` - analytics sink that keeps every tracked event
//! - `FakeSubmitter` - submitter with a scripted outcome
//! - `StalledSubmitter` - submitter that never answers
//! - `new_controller()` / `fill_valid()` - controller setup helpers
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use community_site::cfp::controller::FormController;
use community_site::cfp::drafts::DraftStore;
use community_site::cfp::preview::PreviewRegistry;
use community_site::cfp::storage::{KeyValueStore, MemoryStore, StoreError};
use community_site::cfp::submit::{Submission, SubmitError, Submitter};
use community_site::cfp::types::{Field, ImageFile};
use community_site::events::EventSink;
use serde_json::Value;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_EMAIL: &str = "ada@example.com";
pub const TEST_LINKEDIN: &str = "https://www.linkedin.com/in/ada";
pub const TEST_TITLE: &str = "Rendering at the edge";

// ============================================================================
// STORES
// ============================================================================

/// Memory store that counts writes and removals.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
    removes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

/// Store whose reads and writes always fail, like disabled browser storage.
#[derive(Default)]
pub struct FailingStore {
    pub remove_calls: AtomicUsize,
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("storage disabled")))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("storage disabled")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// ANALYTICS / SUBMISSION FAKES
// ============================================================================

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<String> {
        let events = self.events.lock().unwrap();
        events.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl EventSink for RecordingSink {
    fn track(&self, event: &str, props: Value) {
        self.events.lock().unwrap().push((event.to_string(), props));
    }
}

pub enum Outcome {
    Accept,
    Reject { status: u16, message: String },
}

pub struct FakeSubmitter {
    outcome: Outcome,
    calls: Mutex<Vec<Submission>>,
}

impl FakeSubmitter {
    pub fn accepting() -> Self {
        Self { outcome: Outcome::Accept, calls: Mutex::new(Vec::new()) }
    }

    pub fn rejecting(status: u16, message: &str) -> Self {
        Self {
            outcome: Outcome::Reject { status, message: message.to_string() },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<Submission> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Submitter for FakeSubmitter {
    async fn submit(&self, submission: Submission) -> Result<(), SubmitError> {
        self.calls.lock().unwrap().push(submission);
        match &self.outcome {
            Outcome::Accept => Ok(()),
            Outcome::Reject { status, message } => Err(SubmitError::Rejected {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Never answers; callers have to give up on it.
pub struct StalledSubmitter;

impl Submitter for StalledSubmitter {
    async fn submit(&self, _submission: Submission) -> Result<(), SubmitError> {
        std::future::pending().await
    }
}

// ============================================================================
// CONTROLLER SETUP
// ============================================================================

pub struct Harness {
    pub controller: FormController,
    pub previews: PreviewRegistry,
    pub events: Arc<RecordingSink>,
}

/// Build a controller over `store` with a fresh preview registry and sink.
pub fn new_controller(store: Arc<dyn KeyValueStore>) -> Harness {
    let previews = PreviewRegistry::new();
    let events = Arc::new(RecordingSink::default());
    let controller = FormController::new(DraftStore::new(store), previews.clone(), events.clone());
    Harness { controller, previews, events }
}

pub fn sample_image() -> ImageFile {
    ImageFile {
        file_name: "ada.png".to_string(),
        content_type: "image/png".to_string(),
        data: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

/// Fill every required field with valid values.
pub fn fill_valid(controller: &mut FormController) {
    let values = [
        (Field::FirstName, "Ada"),
        (Field::LastName, "Lovelace"),
        (Field::JobTitle, "Engineer"),
        (Field::Biography, "Writes programs for engines."),
        (Field::Email, TEST_EMAIL),
        (Field::LinkedinProfile, TEST_LINKEDIN),
        (Field::Title, TEST_TITLE),
        (Field::Description, "How we moved rendering closer to users."),
    ];
    for (field, value) in values {
        controller
            .handle_input_change(field, value)
            .expect("Failed to set field");
    }
    controller.handle_topic_change("React").expect("Failed to toggle topic");
    controller
        .handle_image_change(Some(sample_image()))
        .expect("Failed to attach image");
}

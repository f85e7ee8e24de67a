use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::types::ImageFile;
use crate::ids::random_hex;

const PREVIEW_SCHEME: &str = "blob:cfp/";

/// A displayable URI standing in for a locally selected image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Live preview URIs and the images behind them. Every URI handed out by
/// `create` stays resolvable until `revoke` is called for it.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashMap<PreviewUrl, Arc<ImageFile>>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, image: Arc<ImageFile>) -> PreviewUrl {
        let url = PreviewUrl(format!("{PREVIEW_SCHEME}{}", random_hex(16)));
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        live.insert(url.clone(), image);
        url
    }

    pub fn resolve(&self, url: &PreviewUrl) -> Option<Arc<ImageFile>> {
        let live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        live.get(url).cloned()
    }

    /// Release the image behind `url`. Returns false if it was not live.
    pub fn revoke(&self, url: &PreviewUrl) -> bool {
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        live.remove(url).is_some()
    }

    pub fn live_count(&self) -> usize {
        let live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        live.len()
    }
}

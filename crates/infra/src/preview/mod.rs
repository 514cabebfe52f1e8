//! In-process registry for note image previews

use std::collections::HashMap;

use atelier_core::PreviewStore;
use atelier_domain::constants::PREVIEW_URL_SCHEME;
use atelier_domain::{NoteImage, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Keeps selected images addressable by an opaque `blob:` URL until the
/// timer revokes them.
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    entries: Mutex<HashMap<String, NoteImage>>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image behind a live preview URL
    pub fn get(&self, url: &str) -> Option<NoteImage> {
        self.entries.lock().get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn register(&self, image: &NoteImage) -> Result<String> {
        let url = format!("{PREVIEW_URL_SCHEME}{}", Uuid::new_v4());
        self.entries.lock().insert(url.clone(), image.clone());
        debug!(url = %url, file_name = %image.file_name, "preview registered");
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        if self.entries.lock().remove(url).is_none() {
            warn!(url = %url, "revoking unknown preview");
        } else {
            debug!(url = %url, "preview revoked");
        }
    }
}

//! Scoped preview URL for a selected note image

use std::fmt;
use std::sync::Arc;

use atelier_domain::{NoteImage, Result};
use tracing::debug;

use super::ports::PreviewStore;

/// Owns one registered preview URL and revokes it when dropped.
pub struct PreviewHandle {
    url: String,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    /// Register `image` with `store`.
    pub fn create(store: Arc<dyn PreviewStore>, image: &NoteImage) -> Result<Self> {
        let url = store.register(image)?;
        debug!(url = %url, file_name = %image.file_name, "preview registered");
        Ok(Self { url, store })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        debug!(url = %self.url, "preview revoked");
        self.store.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish_non_exhaustive()
    }
}

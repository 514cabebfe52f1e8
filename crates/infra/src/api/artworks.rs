use std::sync::Arc;

use async_trait::async_trait;
use atelier_core::ArtworkService;
use atelier_domain::{Artwork, Result};
use tracing::instrument;

use super::client::ApiClient;

/// [`ArtworkService`] backed by the Atelier REST API
#[derive(Clone, Debug)]
pub struct HttpArtworkService {
    client: Arc<ApiClient>,
}

impl HttpArtworkService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtworkService for HttpArtworkService {
    #[instrument(skip(self))]
    async fn get_artwork(&self, artwork_id: &str) -> Result<Artwork> {
        self.client.get_segments(&["artworks", artwork_id]).await
    }
}

//! Artwork types supplied by the artwork/gallery service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ArtworkId;
use crate::utils::time::deserialize_optional_timestamp;

/// Artwork a session is tracked against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
}

/// Image in an artwork's permanent gallery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

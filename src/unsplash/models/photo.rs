use serde::Serialize;
use serde_json::Value;

use crate::unsplash::schema::{Field, Fields, SchemaViolation};

/// One entry of the photo listing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoResult {
    id: String,
    width: u32,
    height: u32,
    created_at: String,
    description: Option<String>,
    liked_by_user: bool,
    urls: PhotoUrls,
}

/// Renditions of a photo. The URLs are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoUrls {
    thumb: String,
    full: String,
}

impl PhotoResult {
    /// Decodes a single element of the listing response.
    ///
    /// Keys not listed in [`Field`] are ignored.
    pub fn decode(value: &Value) -> Result<Self, SchemaViolation> {
        let fields = Fields::new(None, value)?;

        Ok(Self {
            id: fields.non_empty_string(Field::Id)?,
            width: fields.dimension(Field::Width)?,
            height: fields.dimension(Field::Height)?,
            created_at: fields.string(Field::CreatedAt)?,
            description: fields.optional_string(Field::Description)?,
            liked_by_user: fields.bool(Field::LikedByUser)?,
            urls: PhotoUrls::decode(fields.object(Field::Urls)?)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn liked_by_user(&self) -> bool {
        self.liked_by_user
    }

    pub fn urls(&self) -> &PhotoUrls {
        &self.urls
    }
}

impl PhotoUrls {
    fn decode(fields: Fields<'_>) -> Result<Self, SchemaViolation> {
        Ok(Self {
            thumb: fields.string(Field::Thumb)?,
            full: fields.string(Field::Full)?,
        })
    }

    pub fn thumb(&self) -> &str {
        &self.thumb
    }

    pub fn full(&self) -> &str {
        &self.full
    }
}

impl TryFrom<&Value> for PhotoResult {
    type Error = SchemaViolation;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

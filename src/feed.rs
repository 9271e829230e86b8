//! Paginated photo feed built on top of the listing endpoint.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::unsplash::{self, Client, Decoded, Error, PhotoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// What the feed keeps of a [`PhotoResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    id: String,
    size: Size,
    created_at: Option<DateTime<Utc>>,
    welcome_description: Option<String>,
    thumb_image_url: String,
    large_image_url: String,
    is_liked: bool,
}

impl Photo {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// `None` when the service sent a timestamp that is not RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn welcome_description(&self) -> Option<&str> {
        self.welcome_description.as_deref()
    }

    pub fn thumb_image_url(&self) -> &str {
        &self.thumb_image_url
    }

    pub fn large_image_url(&self) -> &str {
        &self.large_image_url
    }

    pub fn is_liked(&self) -> bool {
        self.is_liked
    }
}

impl From<PhotoResult> for Photo {
    fn from(photo: PhotoResult) -> Self {
        let created_at = DateTime::parse_from_rfc3339(photo.created_at())
            .ok()
            .map(|date| date.with_timezone(&Utc));

        Self {
            id: photo.id().to_owned(),
            size: Size {
                width: photo.width(),
                height: photo.height(),
            },
            created_at,
            welcome_description: photo.description().map(str::to_owned),
            thumb_image_url: photo.urls().thumb().to_owned(),
            large_image_url: photo.urls().full().to_owned(),
            is_liked: photo.liked_by_user(),
        }
    }
}

/// What to do with a listing entry that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Malformed {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone)]
pub struct Feed {
    photos: Vec<Photo>,
    ids: HashSet<String>,
    last_loaded_page: Option<u32>,
    per_page: u32,
    malformed: Malformed,
}

impl Feed {
    pub fn new(per_page: u32, malformed: Malformed) -> Self {
        Self {
            photos: Vec::new(),
            ids: HashSet::new(),
            last_loaded_page: None,
            per_page: per_page.max(1),
            malformed,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn next_page(&self) -> u32 {
        self.last_loaded_page.map_or(1, |page| page + 1)
    }

    /// Loads the next page and returns the photos it added.
    pub async fn fetch_next_page(&mut self, client: &Client) -> unsplash::Result<&[Photo]> {
        let page = self.next_page();
        let items = client.fetch_photos(page, self.per_page).await?;

        self.append_page(page, items)
    }

    /// Sends the like to the service and stores the record it returns.
    pub async fn change_like(
        &mut self,
        client: &Client,
        photo_id: &str,
        liked: bool,
    ) -> unsplash::Result<&Photo> {
        let index = self.position(photo_id)?;

        let updated = client.change_like(photo_id, liked).await?;

        self.replace(index, updated)
    }

    pub fn clear(&mut self) {
        self.photos.clear();
        self.ids.clear();
        self.last_loaded_page = None;
    }

    fn position(&self, photo_id: &str) -> unsplash::Result<usize> {
        self.photos
            .iter()
            .position(|photo| photo.id == photo_id)
            .ok_or_else(|| Error::UnknownPhoto(photo_id.to_owned()))
    }

    /// The record must keep the id it is stored under.
    fn replace(&mut self, index: usize, updated: PhotoResult) -> unsplash::Result<&Photo> {
        if updated.id() != self.photos[index].id {
            warn!(expected = %self.photos[index].id, got = updated.id(), "like response for another photo");

            return Err(Error::InvalidResponse);
        }

        self.photos[index] = Photo::from(updated);

        Ok(&self.photos[index])
    }

    fn append_page(&mut self, page: u32, items: Vec<Decoded>) -> unsplash::Result<&[Photo]> {
        let mut fresh = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Ok(photo) => fresh.push(Photo::from(photo)),

                Err(violation) => match self.malformed {
                    Malformed::Skip => warn!(page, index, %violation, "skipping malformed photo"),
                    Malformed::Abort => return Err(violation.into()),
                },
            }
        }

        let start = self.photos.len();
        for photo in fresh {
            if self.ids.insert(photo.id.clone()) {
                self.photos.push(photo);
            }
        }

        self.last_loaded_page = Some(page);
        info!(page, added = self.photos.len() - start, "loaded feed page");

        Ok(&self.photos[start..])
    }
}

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client as HttpClient, RequestBuilder, Response, Url,
};
use serde_json::Value;
use tracing::{debug, warn};

pub mod error;
pub mod models;
pub mod result;
pub mod schema;

pub use error::Error;
pub use models::{PhotoResult, PhotoUrls, ProfileResult, UserResult};
pub use result::Result;
pub use schema::{Field, Kind, Problem, SchemaViolation};

pub const ACCESS_KEY_VAR: &str = "UNSPLASH_API_KEY";
pub const BEARER_TOKEN_VAR: &str = "UNSPLASH_BEARER_TOKEN";

macro_rules! unsplash_api {
    ($end_point:expr) => {
        concat!("https://api.unsplash.com", $end_point)
    };
}

macro_rules! query_params {
    ($($key:expr => $value:expr),+ $(,)?) => {
        &[
            $(($key, $value.to_string())),+
        ]
    };
}

/// API URL for `segments`, each one percent-encoded as a single path segment.
fn endpoint(segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(unsplash_api!("/")).map_err(|_| Error::Request)?;
    url.path_segments_mut()
        .map_err(|_| Error::Request)?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// A listing element, decoded on its own so one bad entry does not spoil the page.
pub type Decoded = core::result::Result<PhotoResult, SchemaViolation>;

#[derive(Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    /// Public access with an application access key.
    pub fn new<T: AsRef<str>>(access_key: T) -> Result<Self> {
        Self::with_authorization(format!("Client-ID {}", access_key.as_ref()))
    }

    /// User access with an OAuth token, required for likes and the profile.
    pub fn with_bearer_token<T: AsRef<str>>(token: T) -> Result<Self> {
        Self::with_authorization(format!("Bearer {}", token.as_ref()))
    }

    /// Prefers the bearer token when both variables are set.
    pub fn new_from_env() -> Result<Self> {
        let non_empty = |var: &str| std::env::var(var).ok().filter(|value| !value.is_empty());

        if let Some(token) = non_empty(BEARER_TOKEN_VAR) {
            return Self::with_bearer_token(token);
        }

        let access_key = non_empty(ACCESS_KEY_VAR).ok_or(Error::InvalidApiKey)?;

        Self::new(access_key)
    }

    fn with_authorization(auth: String) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&auth).map_err(|_| Error::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|_| Error::Request)?;

        Ok(Self { http })
    }

    /// Fetches one page of the editorial feed. `page` starts at 1.
    pub async fn fetch_photos(&self, page: u32, per_page: u32) -> Result<Vec<Decoded>> {
        debug!(page, per_page, "fetching photos");

        let request = self.http.get(unsplash_api!("/photos")).query(query_params!(
            "page" => page,
            "per_page" => per_page,
        ));

        let response = Self::send_request(request).await?;
        let body: Value = response.json().await.map_err(|_| Error::InvalidResponse)?;

        let Value::Array(items) = body else {
            return Err(Error::InvalidResponse);
        };

        Ok(items.iter().map(PhotoResult::decode).collect())
    }

    /// Likes or unlikes a photo and returns the updated record.
    pub async fn change_like<T: AsRef<str>>(&self, photo_id: T, liked: bool) -> Result<PhotoResult> {
        let url = endpoint(&["photos", photo_id.as_ref(), "like"])?;
        let request = if liked {
            self.http.post(url)
        } else {
            self.http.delete(url)
        };

        let response = Self::send_request(request).await?;
        let body: Value = response.json().await.map_err(|_| Error::InvalidResponse)?;
        let photo = body.get("photo").ok_or(Error::InvalidResponse)?;

        Ok(PhotoResult::decode(photo)?)
    }

    pub async fn fetch_profile(&self) -> Result<ProfileResult> {
        let request = self.http.get(unsplash_api!("/me"));

        let response = Self::send_request(request).await?;
        let profile = response.json().await.map_err(|_| Error::InvalidResponse)?;

        Ok(profile)
    }

    pub async fn fetch_user<T: AsRef<str>>(&self, username: T) -> Result<UserResult> {
        let request = self.http.get(endpoint(&["users", username.as_ref()])?);

        let response = Self::send_request(request).await?;
        let user = response.json().await.map_err(|_| Error::InvalidResponse)?;

        Ok(user)
    }

    pub async fn download_image<T: AsRef<str>>(&self, url: T) -> Result<Bytes> {
        let request = self.http.get(url.as_ref());

        let response = Self::send_request(request).await?;
        let data = response.bytes().await.map_err(|_| Error::InvalidResponse)?;

        Ok(data)
    }

    async fn send_request(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "request failed");

            Error::Request
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %response.url(), "unexpected status");

            return Err(Error::Status(response.status()));
        }

        Ok(response)
    }
}

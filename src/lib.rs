pub mod cache;
pub mod config;
pub mod feed;
pub mod logging;
pub mod profile;
pub mod unsplash;

pub use config::{Config, Download, Fetch, Variant};
pub use feed::{Feed, Malformed, Photo, Size};
pub use profile::Profile;
pub use unsplash::{Client, Error, PhotoResult, PhotoUrls, Result, SchemaViolation};

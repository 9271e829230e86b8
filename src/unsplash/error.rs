use reqwest::StatusCode;
use thiserror::Error;

use super::schema::SchemaViolation;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing or invalid access key")]
    InvalidApiKey,

    #[error("Failed to parse response")]
    InvalidResponse,

    #[error("Failed to send request")]
    Request,

    #[error("HTTP error {0}")]
    Status(StatusCode),

    #[error("{0}")]
    Schema(#[from] SchemaViolation),

    #[error("No photo with id {0} in the feed")]
    UnknownPhoto(String),
}

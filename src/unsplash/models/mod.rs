pub mod photo;
pub mod profile;

pub use photo::{PhotoResult, PhotoUrls};
pub use profile::{ProfileResult, UserResult};

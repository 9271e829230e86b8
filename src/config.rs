use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::{Malformed, Photo};
use crate::unsplash::{ACCESS_KEY_VAR, BEARER_TOKEN_VAR};

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Env(#[from] dotenvy::Error),

    #[error("A default configuration has been created in {}, please review it before proceeding", .0.display())]
    RequiresConfigure(PathBuf),
}

pub type Result<T> = core::result::Result<T, Error>;

pub const ENV_FILE: &str = ".env";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub folder: PathBuf,
    pub max_size: u64,
    pub fetch: Fetch,
    pub download: Download,
}

impl Default for Config {
    fn default() -> Self {
        let folder = dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("ImageFeed");

        Self {
            folder,
            max_size: 100_000_000,
            fetch: Default::default(),
            download: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Fetch {
    pub per_page: u32,
    pub pages: u32,
    pub malformed: Malformed,
}

impl Default for Fetch {
    fn default() -> Self {
        Self {
            per_page: 10,
            pages: 1,
            malformed: Malformed::Skip,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Download {
    pub variant: Variant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Thumb,
    Full,
}

impl Variant {
    pub fn url(self, photo: &Photo) -> &str {
        match self {
            Variant::Thumb => photo.thumb_image_url(),
            Variant::Full => photo.large_image_url(),
        }
    }
}

/// Default config folder, `None` on platforms without one.
pub fn default_folder() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ImageFeed"))
}

/// Loads `.env` and `config.json` from `config_folder`.
///
/// Missing files are created with defaults and reported as
/// [`Error::RequiresConfigure`] so the user can fill in the access key.
pub fn configure<P: AsRef<Path>>(config_folder: P) -> Result<Config> {
    let config_folder = config_folder.as_ref();

    if !config_folder.exists() {
        fs::create_dir_all(config_folder)?;
    }

    let env_path = config_folder.join(ENV_FILE);
    let config_path = config_folder.join(CONFIG_FILE);
    let requires_config = !env_path.exists() || !config_path.exists();

    if requires_config {
        if !env_path.exists() {
            let template = format!("{}=\n# {}=\n", ACCESS_KEY_VAR, BEARER_TOKEN_VAR);

            fs::write(&env_path, template)?;
        }

        if !config_path.exists() {
            let content = serde_json::to_string_pretty(&Config::default())?;

            fs::write(&config_path, content)?;
        }

        return Err(Error::RequiresConfigure(config_folder.to_path_buf()));
    }

    dotenvy::from_path(&env_path)?;

    let content = fs::read_to_string(&config_path)?;
    let config = serde_json::from_str(&content)?;

    Ok(config)
}

use std::io;

use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};

use imagefeed::{cache, config, logging, unsplash, Client, Config, Feed, Photo, Variant};

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Config(#[from] config::Error),

    #[error("{0}")]
    Unsplash(#[from] unsplash::Error),

    #[error("No configuration folder on this platform")]
    NoConfigFolder,
}

type Result<T> = core::result::Result<T, Error>;

async fn load_feed(client: &Client, config: &Config) -> Result<Feed> {
    let mut feed = Feed::new(config.fetch.per_page, config.fetch.malformed);

    for _ in 0..config.fetch.pages {
        if feed.fetch_next_page(client).await?.is_empty() {
            break;
        }
    }

    Ok(feed)
}

async fn download_photos(
    client: &Client,
    feed: &Feed,
    variant: Variant,
) -> Vec<(Photo, unsplash::Result<Bytes>)> {
    let mut tasks = JoinSet::new();
    for photo in feed.photos() {
        let client = client.clone();
        let photo = photo.clone();

        tasks.spawn(async move {
            let data = client.download_image(variant.url(&photo)).await;

            (photo, data)
        });
    }

    tasks.join_all().await
}

#[tokio::main]
async fn main() {
    async fn run() -> Result<()> {
        let path = config::default_folder().ok_or(Error::NoConfigFolder)?;

        let config = config::configure(&path)?;
        let client = Client::new_from_env()?;

        let feed = load_feed(&client, &config).await?;

        let downloads = download_photos(&client, &feed, config.download.variant).await;

        let cached = cache::store(&config.folder, downloads)?;
        let cached = cache::evict(&config.folder, config.max_size, cached)?;

        info!(count = cached.len(), folder = %config.folder.display(), "cached feed");

        Ok(())
    }

    logging::init(logging::DEFAULT_DIRECTIVE);

    if let Err(e) = run().await {
        error!("{}", e);
    }
}

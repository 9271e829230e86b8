//! On-disk image cache: `<id>.jpg` files plus a `feed.json` index.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use tracing::{info, warn};

use crate::feed::Photo;
use crate::unsplash;

pub const INDEX_FILE: &str = "feed.json";
pub const IMAGE_EXTENSION: &str = "jpg";

pub fn image_path<P: AsRef<Path>>(folder: P, id: &str) -> PathBuf {
    folder
        .as_ref()
        .join(format!("{}.{}", id, IMAGE_EXTENSION))
}

pub fn write_index<P: AsRef<Path>>(folder: P, photos: &[Photo]) -> io::Result<()> {
    let content = serde_json::to_string_pretty(photos).map_err(Into::<io::Error>::into)?;

    fs::write(folder.as_ref().join(INDEX_FILE), content)
}

/// Writes every successful download and an index listing exactly those photos.
///
/// Failed downloads are logged and left out.
pub fn store<P: AsRef<Path>>(
    folder: P,
    downloads: Vec<(Photo, unsplash::Result<Bytes>)>,
) -> io::Result<Vec<Photo>> {
    let folder = folder.as_ref();
    fs::create_dir_all(folder)?;

    let mut stored = Vec::with_capacity(downloads.len());
    for (photo, data) in downloads {
        match data {
            Ok(data) => {
                fs::write(image_path(folder, photo.id()), &data)?;
                stored.push(photo);
            }

            Err(err) => warn!(id = photo.id(), error = %err, "download failed, leaving photo out"),
        }
    }

    write_index(folder, &stored)?;

    Ok(stored)
}

struct CachedImage {
    path: PathBuf,
    id: String,
    len: u64,
    modified: SystemTime,
    in_feed: bool,
}

/// Deletes images until the folder fits `max_size` and returns the photos still cached.
///
/// Images of photos outside `photos` go first, oldest first. The index is never
/// deleted; it is rewritten when photos of the current feed had to go.
pub fn evict<P: AsRef<Path>>(folder: P, max_size: u64, photos: Vec<Photo>) -> io::Result<Vec<Photo>> {
    let folder = folder.as_ref();
    let ids: HashSet<&str> = photos.iter().map(Photo::id).collect();

    let mut size = 0;
    let mut images = Vec::new();
    for entry in folder.read_dir()? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        size += metadata.len();

        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != IMAGE_EXTENSION) {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()).map(str::to_owned) else {
            continue;
        };

        images.push(CachedImage {
            in_feed: ids.contains(id.as_str()),
            id,
            len: metadata.len(),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            path,
        });
    }

    if size <= max_size {
        return Ok(photos);
    }

    images.sort_by_key(|image| (image.in_feed, image.modified));

    let mut evicted = HashSet::new();
    for image in images {
        if size <= max_size {
            break;
        }

        fs::remove_file(&image.path)?;
        size = size.saturating_sub(image.len);

        info!(path = %image.path.display(), "evicted");

        if image.in_feed {
            evicted.insert(image.id);
        }
    }

    if evicted.is_empty() {
        return Ok(photos);
    }

    let kept: Vec<_> = photos
        .into_iter()
        .filter(|photo| !evicted.contains(photo.id()))
        .collect();

    write_index(folder, &kept)?;

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use std::{fs::File, time::Duration};

    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use super::*;
    use crate::unsplash::{Error, PhotoResult};

    fn scratch_folder(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let folder = std::env::temp_dir().join(format!("imagefeed-cache-{}-{}", name, nanos));
        fs::create_dir_all(&folder).unwrap();

        folder
    }

    fn photo(id: &str) -> Photo {
        Photo::from(
            PhotoResult::decode(&json!({
                "id": id,
                "width": 1,
                "height": 1,
                "created_at": "2023-01-01T00:00:00Z",
                "liked_by_user": false,
                "urls": { "thumb": "https://x/t.jpg", "full": "https://x/f.jpg" }
            }))
            .unwrap(),
        )
    }

    fn write_aged(path: &Path, len: usize, age_secs: u64) {
        fs::write(path, vec![0u8; len]).unwrap();

        let modified = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    fn indexed_ids(folder: &Path) -> Vec<String> {
        let index: Value =
            serde_json::from_str(&fs::read_to_string(folder.join(INDEX_FILE)).unwrap()).unwrap();

        index
            .as_array()
            .unwrap()
            .iter()
            .map(|photo| photo["id"].as_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn failed_downloads_are_left_out_of_the_index() {
        let folder = scratch_folder("store");

        let stored = store(
            &folder,
            vec![
                (photo("a"), Ok(Bytes::from_static(b"aaaa"))),
                (photo("b"), Err(Error::Status(StatusCode::NOT_FOUND))),
                (photo("c"), Ok(Bytes::from_static(b"cccc"))),
            ],
        )
        .unwrap();

        let ids: Vec<_> = stored.iter().map(Photo::id).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(indexed_ids(&folder), ["a", "c"]);
        assert!(image_path(&folder, "a").exists());
        assert!(!image_path(&folder, "b").exists());

        fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn index_survives_eviction_even_when_oldest() {
        let folder = scratch_folder("index");
        let photos = vec![photo("a"), photo("b")];

        write_aged(&folder.join(INDEX_FILE), 10, 3_600);
        write_aged(&image_path(&folder, "stale"), 40, 1_800);
        write_aged(&image_path(&folder, "a"), 40, 60);
        write_aged(&image_path(&folder, "b"), 40, 30);

        let kept = evict(&folder, 100, photos).unwrap();

        assert_eq!(kept.len(), 2);
        assert!(folder.join(INDEX_FILE).exists());
        assert!(!image_path(&folder, "stale").exists());
        assert!(image_path(&folder, "a").exists());
        assert!(image_path(&folder, "b").exists());

        fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn evicting_feed_images_rewrites_the_index() {
        let folder = scratch_folder("rewrite");
        let photos = vec![photo("a"), photo("b")];

        write_index(&folder, &photos).unwrap();
        write_aged(&image_path(&folder, "a"), 40, 60);
        write_aged(&image_path(&folder, "b"), 40, 30);

        let index_len = fs::metadata(folder.join(INDEX_FILE)).unwrap().len();
        let kept = evict(&folder, index_len + 40, photos).unwrap();

        let ids: Vec<_> = kept.iter().map(Photo::id).collect();
        assert_eq!(ids, ["b"]);
        assert_eq!(indexed_ids(&folder), ["b"]);
        assert!(!image_path(&folder, "a").exists());

        fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn folder_within_budget_is_untouched() {
        let folder = scratch_folder("budget");
        let photos = vec![photo("a")];

        write_aged(&image_path(&folder, "old"), 10, 600);
        write_aged(&image_path(&folder, "a"), 10, 60);

        let kept = evict(&folder, 1_000, photos).unwrap();

        assert_eq!(kept.len(), 1);
        assert!(image_path(&folder, "old").exists());

        fs::remove_dir_all(&folder).unwrap();
    }
}

//! Photo storage - listing of captured photos in the active album.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Sub-directory holding camera originals
pub const ORIGINAL_DIR: &str = "original";
/// Sub-directory holding screen-sized previews
pub const PREVIEW_DIR: &str = "preview";
/// Sub-directory holding gallery thumbnails
pub const THUMB_DIR: &str = "thumb";
/// Sub-directory receiving RAW files downloaded from the card
pub const RAW_DIR: &str = "raw";

/// Captured photo descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// File name inside the album sub-directories
    pub filename: String,
    /// Capture (modification) time
    pub timestamp: DateTime<Utc>,
    /// Preview URL
    pub url: String,
    /// Thumbnail URL
    pub thumb_url: String,
}

impl Photo {
    /// Build a descriptor with URLs derived from `filename`
    #[must_use]
    pub fn new(filename: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let filename = filename.into();
        Self {
            url: format!("/photos/{PREVIEW_DIR}/{filename}"),
            thumb_url: format!("/photos/{THUMB_DIR}/{filename}"),
            filename,
            timestamp,
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false)
}

/// File-system backed view of one album directory
#[derive(Debug)]
pub struct PhotoStore {
    root: RwLock<PathBuf>,
}

impl PhotoStore {
    /// Create a store rooted at an album directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: RwLock::new(root.into()),
        }
    }

    /// Current album directory
    #[must_use]
    pub fn root_dir(&self) -> PathBuf {
        self.root.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Switch to another album directory
    pub fn set_root_dir(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        debug!(root = %root.display(), "Photo store root changed");
        *self.root.write().unwrap_or_else(|e| e.into_inner()) = root;
    }

    /// Create the original/preview/thumb sub-directories
    pub fn ensure_dirs(&self) -> Result<()> {
        let root = self.root_dir();
        for dir in [ORIGINAL_DIR, PREVIEW_DIR, THUMB_DIR] {
            std::fs::create_dir_all(root.join(dir))?;
        }
        Ok(())
    }

    /// Photos in the album, newest first
    pub fn list(&self) -> Result<Vec<Photo>> {
        let dir = self.root_dir().join(ORIGINAL_DIR);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut photos = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified: DateTime<Utc> = metadata
                .modified()
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());
            let filename = entry.file_name().to_string_lossy().into_owned();
            photos.push(Photo::new(filename, modified));
        }

        photos.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(photos)
    }

    /// Most recent photo, if any
    pub fn latest(&self) -> Result<Option<Photo>> {
        Ok(self.list()?.into_iter().next())
    }
}

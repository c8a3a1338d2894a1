//! Album and gallery operations
//!
//! File-system CRUD on `<photos_base_path>/<album>/{original,preview,thumb}`
//! plus the settings updates that share the album context.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::camera::CaptureStrategy;
use crate::error::{Error, Result};
use crate::settings::{
    clamp_countdown, clamp_preview, clamp_trigger_delay, sanitize_album_name, BoothSettings,
    SettingsUpdate, DEFAULT_ALBUM,
};
use crate::storage::{ORIGINAL_DIR, PREVIEW_DIR, THUMB_DIR};

use super::core::Orchestrator;
use super::types::AlbumInfo;

/// Directory names left over from the flat single-album layout
const LEGACY_DIRS: [&str; 5] = ["original", "preview", "thumb", "css", "js"];

const GALLERY_DIRS: [&str; 3] = [ORIGINAL_DIR, PREVIEW_DIR, THUMB_DIR];

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_jpeg(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

fn read_dir_or_empty(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(entries.collect::<std::io::Result<Vec<_>>>()?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn count_jpegs(dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in read_dir_or_empty(dir)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_hidden(&name) && is_jpeg(&name) && entry.file_type()?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in read_dir_or_empty(dir)? {
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}

impl Orchestrator {
    /// Directory of the active album
    #[must_use]
    pub fn album_dir(&self) -> PathBuf {
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        settings.photos_base_path.join(&settings.current_album)
    }

    fn album_path(&self, id: &str) -> PathBuf {
        self.base_path().join(id)
    }

    /// Create the active album's sub-directories
    pub fn ensure_album_dirs(&self) -> Result<()> {
        self.store.ensure_dirs()
    }

    /// Switch the active album.
    ///
    /// `name` may be a display name or an existing id. Returns the sanitized
    /// id. The camera and photo store follow the new directory.
    pub fn set_album(&self, name: &str) -> Result<String> {
        let id = sanitize_album_name(name);
        let display = name.trim();

        let dir = {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            let keep_existing = display == id && settings.album_display_names.contains_key(&id);
            if !keep_existing {
                let display = if display.is_empty() { id.as_str() } else { display };
                settings
                    .album_display_names
                    .insert(id.clone(), display.to_string());
            }
            settings
                .album_capture_methods
                .entry(id.clone())
                .or_default();
            settings.current_album = id.clone();
            settings.photos_base_path.join(&id)
        };

        self.camera.set_data_dir(&dir);
        self.store.set_root_dir(&dir);
        self.store.ensure_dirs()?;
        self.activity.info("album", format!("Active album: {id}"));
        Ok(id)
    }

    /// Set the capture strategy of an album
    pub fn set_album_strategy(&self, name: &str, strategy: CaptureStrategy) {
        let id = sanitize_album_name(name);
        let active = {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            settings.album_capture_methods.insert(id.clone(), strategy);
            settings.current_album == id
        };
        if active {
            self.camera.set_strategy(strategy);
        }
        self.activity
            .info("album", format!("Capture strategy for {id}: {strategy}"));
    }

    /// All albums under the photos directory, sorted by id
    pub fn list_albums(&self) -> Result<Vec<AlbumInfo>> {
        let settings = self.settings();
        let mut albums = Vec::new();

        for entry in read_dir_or_empty(&settings.photos_base_path)? {
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            if is_hidden(&id) || LEGACY_DIRS.contains(&id.as_str()) {
                continue;
            }
            let path = entry.path();
            albums.push(AlbumInfo {
                display_name: settings.display_name(&id),
                photo_count: count_jpegs(&path.join(ORIGINAL_DIR))?,
                size_bytes: album_size(&path)?,
                capture_method: settings.strategy_for(&id),
                active: id == settings.current_album,
                id,
            });
        }

        albums.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(albums)
    }

    /// Number of JPEG originals in an album
    pub fn gallery_count(&self, name: &str) -> Result<usize> {
        let id = sanitize_album_name(name);
        count_jpegs(&self.album_path(&id).join(ORIGINAL_DIR))
    }

    /// Bytes used by an album's original, preview and thumb files
    pub fn gallery_size(&self, name: &str) -> Result<u64> {
        let id = sanitize_album_name(name);
        album_size(&self.album_path(&id))
    }

    /// Delete every photo of an album but keep the album.
    ///
    /// Returns the number of removed files.
    pub fn empty_gallery(&self, name: &str) -> Result<usize> {
        let id = sanitize_album_name(name);
        let root = self.album_path(&id);
        let mut removed = 0;
        for sub in GALLERY_DIRS {
            for entry in read_dir_or_empty(&root.join(sub))? {
                if entry.file_type()?.is_file() {
                    fs::remove_file(entry.path())?;
                    removed += 1;
                }
            }
        }
        self.activity
            .info("album", format!("Emptied album {id} ({removed} files)"));
        Ok(removed)
    }

    /// Remove an album directory and its settings entries.
    ///
    /// The default album and the active album cannot be deleted.
    pub fn delete_gallery(&self, name: &str) -> Result<()> {
        let id = sanitize_album_name(name);
        if id == DEFAULT_ALBUM {
            return Err(Error::Album("the default album cannot be deleted".to_string()));
        }
        if id == self.current_album() {
            return Err(Error::Album("the active album cannot be deleted".to_string()));
        }

        let dir = self.album_path(&id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(album = %id, "Album directory already gone");
            }
            Err(e) => return Err(e.into()),
        }

        {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            settings.album_display_names.remove(&id);
            settings.album_capture_methods.remove(&id);
        }
        self.activity.info("album", format!("Deleted album {id}"));
        Ok(())
    }

    /// Apply a partial settings update and return the new settings.
    ///
    /// Numeric values are clamped. An unknown capture strategy rejects the
    /// whole update before anything changes.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<BoothSettings> {
        let strategy = update
            .capture_strategy
            .as_deref()
            .map(str::parse::<CaptureStrategy>)
            .transpose()?;

        {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            if let Some(value) = update.countdown_seconds {
                settings.countdown_seconds = clamp_countdown(value);
            }
            if let Some(value) = update.preview_display_seconds {
                settings.preview_display_seconds = clamp_preview(value);
            }
            if let Some(value) = update.trigger_delay_ms {
                settings.trigger_delay_ms = clamp_trigger_delay(value);
            }
        }

        if let Some(album) = update.current_album.as_deref() {
            self.set_album(album)?;
        }
        if let Some(strategy) = strategy {
            let album = self.current_album();
            self.set_album_strategy(&album, strategy);
        }

        let settings = self.settings();
        self.activity.info(
            "settings",
            format!(
                "Settings updated: countdown {}s, preview {}s, delay {} ms",
                settings.countdown_seconds,
                settings.preview_display_seconds,
                settings.trigger_delay_ms
            ),
        );
        Ok(settings)
    }
}

fn album_size(root: &Path) -> Result<u64> {
    let mut total = 0;
    for sub in GALLERY_DIRS {
        total += dir_size(&root.join(sub))?;
    }
    Ok(total)
}

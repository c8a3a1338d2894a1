//! Preview/thumbnail generation

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use photobooth_core::{ImageProcessor, PreviewReady};
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::config::ImagingConfig;
use crate::error::{Error, Result};

/// Directory names next to `original/`
const PREVIEW_DIR: &str = "preview";
const THUMB_DIR: &str = "thumb";

/// [`ImageProcessor`] backed by the `image` crate
#[derive(Debug, Clone, Default)]
pub struct ResizeProcessor {
    config: ImagingConfig,
}

/// Destination paths derived from `<album>/original/<file>`
#[derive(Debug, PartialEq, Eq)]
struct Outputs {
    preview: PathBuf,
    thumb: PathBuf,
}

fn outputs_for(original: &Path) -> Result<Outputs> {
    let layout_err = || Error::Layout(original.display().to_string());
    let filename = original.file_name().ok_or_else(layout_err)?;
    let album = original
        .parent()
        .and_then(Path::parent)
        .ok_or_else(layout_err)?;
    Ok(Outputs {
        preview: album.join(PREVIEW_DIR).join(filename),
        thumb: album.join(THUMB_DIR).join(filename),
    })
}

/// Decode `path`, applying the EXIF orientation
fn decode(path: &Path) -> Result<DynamicImage> {
    let decode_err = |message: String| Error::Decode {
        path: path.display().to_string(),
        message,
    };
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| decode_err(e.to_string()))?;
    let orientation = decoder.orientation().map_err(|e| decode_err(e.to_string()))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_err(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Scale `img` to fit a `size` x `size` box and write it as JPEG.
///
/// Images already inside the box are re-encoded without upscaling.
fn write_fitted(img: &DynamicImage, dest: &Path, size: u32, quality: u8) -> Result<()> {
    let rgb = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3).to_rgb8()
    } else {
        img.to_rgb8()
    };

    if let Some(dir) = dest.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let writer = BufWriter::new(File::create(dest)?);
    JpegEncoder::new_with_quality(writer, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| Error::Encode {
            path: dest.display().to_string(),
            message: e.to_string(),
        })
}

fn joined<T>(res: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    res.map_err(|e| Error::Worker(e.to_string()))?
}

impl ResizeProcessor {
    /// Create a processor with the given sizes
    #[must_use]
    pub fn new(config: ImagingConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ImagingConfig {
        &self.config
    }

    async fn generate(&self, original: &Path, on_preview_ready: PreviewReady) -> Result<()> {
        let started = Instant::now();
        let outputs = outputs_for(original)?;

        let source = original.to_path_buf();
        let img = Arc::new(joined(tokio::task::spawn_blocking(move || decode(&source)).await)?);

        let cfg = self.config;
        let preview_img = Arc::clone(&img);
        let preview_path = outputs.preview.clone();
        let preview = tokio::task::spawn_blocking(move || {
            write_fitted(&preview_img, &preview_path, cfg.preview_width, cfg.preview_quality)
        });
        let thumb_path = outputs.thumb.clone();
        let thumb = tokio::task::spawn_blocking(move || {
            write_fitted(&img, &thumb_path, cfg.thumbnail_width, cfg.thumbnail_quality)
        });

        let preview_result = joined(preview.await);
        match &preview_result {
            Ok(()) => on_preview_ready(),
            Err(e) => error!(error = %e, path = %outputs.preview.display(), "Failed to generate preview"),
        }

        if let Err(e) = joined(thumb.await) {
            warn!(error = %e, path = %outputs.thumb.display(), "Failed to generate thumbnail");
        }

        info!(
            file = %original.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed photo"
        );
        preview_result
    }
}

#[async_trait]
impl ImageProcessor for ResizeProcessor {
    async fn process(&self, original: &Path, on_preview_ready: PreviewReady) -> photobooth_core::Result<()> {
        Ok(self.generate(original, on_preview_ready).await?)
    }
}

//! Output sizes and JPEG qualities

/// Default preview bounding box in pixels
pub const DEFAULT_PREVIEW_WIDTH: u32 = 1024;
/// Default thumbnail bounding box in pixels
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 256;
/// Default JPEG quality for both outputs
pub const DEFAULT_QUALITY: u8 = 70;

/// Sizes and qualities of the derived images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagingConfig {
    /// Preview fits within a square of this size
    pub preview_width: u32,
    /// Preview JPEG quality (1..=100)
    pub preview_quality: u8,
    /// Thumbnail fits within a square of this size
    pub thumbnail_width: u32,
    /// Thumbnail JPEG quality (1..=100)
    pub thumbnail_quality: u8,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_PREVIEW_WIDTH,
            preview_quality: DEFAULT_QUALITY,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_quality: DEFAULT_QUALITY,
        }
    }
}

impl ImagingConfig {
    /// Set the preview size and quality
    #[must_use]
    pub fn with_preview(mut self, width: u32, quality: u8) -> Self {
        self.preview_width = width;
        self.preview_quality = quality;
        self
    }

    /// Set the thumbnail size and quality
    #[must_use]
    pub fn with_thumbnail(mut self, width: u32, quality: u8) -> Self {
        self.thumbnail_width = width;
        self.thumbnail_quality = quality;
        self
    }
}

//! Image processing collaborator contract.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Callback fired once the preview artifact is written
pub type PreviewReady = Box<dyn FnOnce() + Send + 'static>;

/// Preview/thumbnail generator
///
/// For an original at `<album>/original/<file>` implementations write
/// `<album>/preview/<file>` and `<album>/thumb/<file>`. `on_preview_ready`
/// runs at most once, only if the preview succeeded, and before `process`
/// returns. A failed thumbnail does not suppress it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProcessor: Send + Sync {
    /// Generate derived images for `original`
    async fn process(&self, original: &Path, on_preview_ready: PreviewReady) -> Result<()>;
}

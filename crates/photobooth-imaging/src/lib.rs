//! Photobooth Imaging - preview and thumbnail pipeline
//!
//! [`ResizeProcessor`] implements [`photobooth_core::ImageProcessor`] with the
//! `image` crate. Both outputs are produced in parallel on blocking threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod processor;

pub use config::{ImagingConfig, DEFAULT_PREVIEW_WIDTH, DEFAULT_QUALITY, DEFAULT_THUMBNAIL_WIDTH};
pub use error::{Error, Result};
pub use processor::ResizeProcessor;

//! Photobooth Camera - gphoto2 driver
//!
//! Implements [`photobooth_core::Camera`] on top of the `gphoto2` command
//! line tool. Every capture strategy maps to one gphoto2 invocation with a
//! bounded runtime. Mock mode writes generated JPEGs instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
pub mod config;
pub mod error;
pub mod gphoto;
mod mock;
mod parse;

pub use config::{CameraConfig, DEFAULT_COMMAND_TIMEOUT, DEFAULT_MOCK_DELAY, DEFAULT_TETHERED_TIMEOUT};
pub use error::{Error, Result};
pub use gphoto::GphotoCamera;

//! Mock capture support

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use photobooth_core::CameraInfo;

use crate::error::{Error, Result};

const MOCK_WIDTH: u32 = 1200;
const MOCK_HEIGHT: u32 = 800;

/// Static information reported in mock mode
pub(crate) fn mock_info() -> CameraInfo {
    CameraInfo {
        connected: true,
        model: "Canon EOS 700D (Mock)".to_string(),
        manufacturer: "Canon Inc.".to_string(),
        serial_number: "MOCK-123456".to_string(),
        lens_name: "EF-S 18-55mm f/3.5-5.6 IS STM".to_string(),
        battery_level: "75%".to_string(),
        storage_total: "32 GB".to_string(),
        storage_free: "28 GB".to_string(),
    }
}

/// Write a decodable gradient JPEG to `path`.
///
/// `seed` shifts the colours so consecutive shots differ.
pub(crate) fn write_mock_jpeg(path: &Path, seed: u32) -> Result<()> {
    let shift = (seed.wrapping_mul(37) % 256) as u8;
    let img = RgbImage::from_fn(MOCK_WIDTH, MOCK_HEIGHT, |x, y| {
        let r = ((x * 255) / MOCK_WIDTH) as u8;
        let g = ((y * 255) / MOCK_HEIGHT) as u8;
        Rgb([r.wrapping_add(shift), g, 128u8.wrapping_add(shift)])
    });

    let writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(writer, 85)
        .encode_image(&img)
        .map_err(|e| Error::MockImage(e.to_string()))
}

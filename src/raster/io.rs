//! I/O helpers for the demo tool: color image loading and JSON output.
//!
//! - `load_color_image`: read a PNG/JPEG/etc. into packed 24-bit RGB values.
//! - `write_json_file`: pretty-print a serializable value to disk.

use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned row-major buffer of packed `0x00RRGGBB` pixels.
#[derive(Clone, Debug)]
pub struct ColorImageU32 {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl ColorImageU32 {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width * height, "pixel buffer size mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> u32 {
        self.pixels[row * self.width + col]
    }
}

/// Load an image from disk and pack it into 24-bit RGB values.
pub fn load_color_image(path: &Path) -> Result<ColorImageU32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    Ok(ColorImageU32::new(width, height, pixels))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Raster buffers and the fixed photometric normalization recipe

use crate::{Error, Result};
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader, RgbaImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Encoded screenshot bytes as returned by the rendering engine
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap encoded bytes, probing the header for dimensions
    pub fn from_encoded(data: Vec<u8>) -> Result<Self> {
        let (width, height) = ImageReader::new(Cursor::new(&data))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Self { width, height, data })
    }
}

/// Parameters of the normalization recipe.
///
/// Brightness and contrast are percentages in `-100.0..=100.0`, 0 neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub brightness: f64,
    pub contrast: f64,
    /// Images wider than this are downscaled to exactly this width
    pub max_width: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            brightness: -20.0,
            contrast: 40.0,
            max_width: 1200,
        }
    }
}

/// Final adjusted (and possibly downscaled) pixels
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub pixels: RgbaImage,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .map_err(|e| Error::EncodeError(e.to_string()))?;
        Ok(out)
    }

    /// Encode as PNG and write to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let png = self.to_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }
}

/// Normalize with the default recipe (brightness -20, contrast +40, max width 1200)
pub fn normalize(raw: &RasterBuffer) -> Result<NormalizedImage> {
    normalize_with(raw, &NormalizeOptions::default())
}

pub fn normalize_with(raw: &RasterBuffer, options: &NormalizeOptions) -> Result<NormalizedImage> {
    let mut pixels = image::load_from_memory(&raw.data)?.to_rgba8();

    adjust_brightness(&mut pixels, options.brightness);
    adjust_contrast(&mut pixels, options.contrast);

    let (width, height) = pixels.dimensions();
    let (target_w, target_h) = target_size(width, height, options.max_width);
    if (target_w, target_h) != (width, height) {
        debug!("resizing raster {}x{} -> {}x{}", width, height, target_w, target_h);
        pixels = image::imageops::resize(&pixels, target_w, target_h, FilterType::Lanczos3);
    }

    Ok(NormalizedImage { pixels })
}

/// Output size for an image of `width` x `height` under a width cap.
///
/// Height is `round(height * max_width / width)`, at least 1.
pub fn target_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let (w, h, m) = (width as u64, height as u64, max_width as u64);
    let scaled = (2 * h * m + w) / (2 * w);
    (max_width, scaled.max(1) as u32)
}

/// Shift every colour channel by `255 * percentage / 100`
pub fn adjust_brightness(pixels: &mut RgbaImage, percentage: f64) {
    let percentage = percentage.clamp(-100.0, 100.0);
    let shift = 255.0 * percentage / 100.0;
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = clamp_channel(i as f64 + shift);
    }
    apply_lut(pixels, &lut);
}

/// Stretch (positive) or flatten (negative) colour channels around mid-grey
pub fn adjust_contrast(pixels: &mut RgbaImage, percentage: f64) {
    let percentage = percentage.clamp(-100.0, 100.0);
    let v = (100.0 + percentage) / 100.0;
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let c = i as f64 / 255.0;
        *slot = if (0.0..=1.0).contains(&v) {
            clamp_channel((0.5 + (c - 0.5) * v) * 255.0)
        } else if v < 2.0 {
            clamp_channel((0.5 + (c - 0.5) * (1.0 / (2.0 - v))) * 255.0)
        } else if c >= 0.5 {
            255
        } else {
            0
        };
    }
    apply_lut(pixels, &lut);
}

fn apply_lut(pixels: &mut RgbaImage, lut: &[u8; 256]) {
    for px in pixels.pixels_mut() {
        // alpha untouched
        for channel in px.0.iter_mut().take(3) {
            *channel = lut[*channel as usize];
        }
    }
}

fn clamp_channel(value: f64) -> u8 {
    (value + 0.5).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 200]))
    }

    #[test]
    fn target_size_caps_width_and_rounds_height() {
        assert_eq!(target_size(1500, 1000, 1200), (1200, 800));
        assert_eq!(target_size(1500, 999, 1200), (1200, 799));
        assert_eq!(target_size(1500, 1001, 1200), (1200, 801));
        assert_eq!(target_size(900, 600, 1200), (900, 600));
        assert_eq!(target_size(1200, 5, 1200), (1200, 5));
        assert_eq!(target_size(5000, 1, 1200), (1200, 1));
    }

    #[test]
    fn brightness_shifts_and_clamps() {
        let mut img = solid(1, 1, 128);
        adjust_brightness(&mut img, -20.0);
        assert_eq!(img.get_pixel(0, 0).0, [77, 77, 77, 200]);

        let mut dark = solid(1, 1, 10);
        adjust_brightness(&mut dark, -20.0);
        assert_eq!(dark.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn contrast_stretches_around_mid_grey() {
        let mut img = solid(1, 1, 77);
        adjust_contrast(&mut img, 40.0);
        assert_eq!(img.get_pixel(0, 0).0, [43, 43, 43, 200]);

        let mut light = solid(1, 1, 204);
        adjust_contrast(&mut light, 40.0);
        assert_eq!(light.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn zero_adjustments_are_identity() {
        let mut img = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 99, 255]));
        let before = img.clone();
        adjust_brightness(&mut img, 0.0);
        adjust_contrast(&mut img, 0.0);
        assert_eq!(img, before);
    }

    #[test]
    fn undecodable_bytes_are_a_decode_error() {
        let raw = RasterBuffer { width: 1, height: 1, data: b"not an image".to_vec() };
        match normalize(&raw) {
            Err(Error::DecodeError(_)) => {}
            other => panic!("expected DecodeError, got {:?}", other.map(|i| i.width())),
        }
    }
}

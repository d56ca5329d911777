//! Image processing for wallpapers.
//!
//! Produces the blurred variant of a wallpaper: the source is cover-resized
//! to a fixed resolution, blurred, and encoded as JPEG.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use thiserror::Error;

use crate::constants::SUPPORTED_EXTENSIONS;

/// JPEG quality of blurred output.
const JPEG_QUALITY: u8 = 95;

/// Sigma above which blurring happens on a downscaled copy.
const FAST_BLUR_THRESHOLD: f32 = 5.0;

/// Downscale factor used by the fast blur path.
const FAST_BLUR_SCALE: u32 = 4;

/// Errors that can occur during image processing.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Failed to read or decode the source image.
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: image::ImageError,
    },
    /// Failed to encode the processed image.
    #[error("failed to encode processed image: {0}")]
    Encode(#[source] image::ImageError),
    /// IO error while opening the source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A setting string that does not match `<a>x<b>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got `{value}`")]
pub struct ParseDimensionError {
    expected: &'static str,
    value: String,
}

impl ParseDimensionError {
    fn new(expected: &'static str, value: &str) -> Self {
        Self { expected, value: value.to_string() }
    }
}

/// Output resolution of the blurred image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self { Self { width: 1920, height: 1080 } }
}

impl FromStr for Resolution {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDimensionError::new("WIDTHxHEIGHT", s);
        let (width, height) = split_pair(s).ok_or_else(err)?;
        let width: u32 = width.parse().map_err(|_| err())?;
        let height: u32 = height.parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Blur strength in `RADIUSxSIGMA` form.
///
/// The radius is accepted for compatibility with tools that take the same
/// notation; only sigma drives the filter. A zero sigma disables blurring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurStrength {
    pub radius: u32,
    pub sigma: f32,
}

impl BlurStrength {
    /// Returns true if this strength applies no filter.
    #[must_use]
    pub fn is_none(&self) -> bool { self.sigma <= 0.0 }
}

impl Default for BlurStrength {
    fn default() -> Self { Self { radius: 0, sigma: 8.0 } }
}

impl FromStr for BlurStrength {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDimensionError::new("RADIUSxSIGMA", s);
        let (radius, sigma) = split_pair(s).ok_or_else(err)?;
        let radius: u32 = radius.parse().map_err(|_| err())?;
        let sigma: f32 = sigma.parse().map_err(|_| err())?;
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(err());
        }
        Ok(Self { radius, sigma })
    }
}

impl fmt::Display for BlurStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.radius, self.sigma)
    }
}

fn split_pair(s: &str) -> Option<(&str, &str)> {
    let (a, b) = s.trim().split_once(['x', 'X'])?;
    Some((a.trim(), b.trim()))
}

/// Checks if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Loads `source`, renders the blurred variant and returns JPEG bytes.
///
/// # Errors
///
/// Returns an error if the source cannot be decoded or the result cannot be
/// encoded.
pub fn render_blurred(
    source: &Path,
    strength: BlurStrength,
    resolution: Resolution,
) -> Result<Vec<u8>, ProcessingError> {
    let img = ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|source_err| ProcessingError::ImageRead {
            path: source.display().to_string(),
            source: source_err,
        })?;

    let processed = blur_image(&img, strength, resolution);
    encode_jpeg(&processed)
}

/// Cover-resizes `img` to `resolution` and applies the blur.
#[must_use]
pub fn blur_image(img: &DynamicImage, strength: BlurStrength, resolution: Resolution) -> DynamicImage {
    let resized = resize_to_screen(img, resolution);
    if strength.is_none() {
        return resized;
    }
    apply_fast_blur(&resized, strength.sigma)
}

/// Encodes `img` as JPEG.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(ProcessingError::Encode)?;
    Ok(bytes)
}

/// Resizes an image to cover the target dimensions while maintaining aspect ratio.
///
/// Uses "cover" scaling: the image is scaled to fill the entire target,
/// cropping edges if necessary to avoid letterboxing.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn resize_to_screen(img: &DynamicImage, target: Resolution) -> DynamicImage {
    let (img_width, img_height) = img.dimensions();

    let scale_x = f64::from(target.width) / f64::from(img_width);
    let scale_y = f64::from(target.height) / f64::from(img_height);
    let scale = scale_x.max(scale_y);

    // Rounding up keeps the scaled image at least as large as the target.
    let scaled_width = (f64::from(img_width) * scale).ceil().max(f64::from(target.width)) as u32;
    let scaled_height = (f64::from(img_height) * scale).ceil().max(f64::from(target.height)) as u32;

    // CatmullRom: good quality, much faster than Lanczos3
    let resized = img.resize_exact(
        scaled_width,
        scaled_height,
        image::imageops::FilterType::CatmullRom,
    );

    // Center crop
    let crop_x = (scaled_width.saturating_sub(target.width)) / 2;
    let crop_y = (scaled_height.saturating_sub(target.height)) / 2;

    resized.crop_imm(crop_x, crop_y, target.width, target.height)
}

/// Applies a Gaussian blur, approximating large sigmas on a downscaled copy.
#[allow(clippy::cast_precision_loss)]
fn apply_fast_blur(img: &DynamicImage, sigma: f32) -> DynamicImage {
    if sigma <= FAST_BLUR_THRESHOLD {
        return img.blur(sigma);
    }

    // Downscale -> blur at smaller size -> upscale
    let (width, height) = img.dimensions();
    let small_width = (width / FAST_BLUR_SCALE).max(1);
    let small_height = (height / FAST_BLUR_SCALE).max(1);

    let small = img.resize_exact(
        small_width,
        small_height,
        image::imageops::FilterType::CatmullRom,
    );
    let blurred_small = small.blur((sigma / FAST_BLUR_SCALE as f32).max(1.0));

    blurred_small.resize_exact(width, height, image::imageops::FilterType::CatmullRom)
}

//! Encodes a noise vector into an RGB raster and recovers it.
//!
//! The raster's bytes, read row-major across channels, are the fingerprint header followed by
//! one quantized byte per noise value and zeroed padding up to the end of the grid.

mod grid;
mod header;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

pub use header::Fingerprint;

use crate::{DecodeErr, EncodeErr, NoiseRange};
use grid::CHANNELS;
use header::HEADER_LEN;

const PAD: u8 = 0;

/// A noise vector encoded as an image.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseImage(RgbImage);

impl NoiseImage {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// The raw row-major channel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    /// Serializes the image into a PNG container.
    pub fn to_png(&self) -> Result<Vec<u8>, EncodeErr> {
        write_png(self.0.clone())
    }
}

/// Serializes any image into a PNG container.
///
/// # Arguments
/// * `image` - The image to serialize.
///
/// # Returns
/// The PNG bytes or the underlying `image` error.
pub fn write_png(image: impl Into<DynamicImage>) -> Result<Vec<u8>, EncodeErr> {
    let mut cursor = Cursor::new(Vec::new());
    image.into().write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

/// Encodes `values` into a noise image.
///
/// The output is a pure function of its arguments.
///
/// # Arguments
/// * `values` - The noise vector.
/// * `fingerprint` - Identifies the model, its length must match `values`.
/// * `range` - The interval values are clamped into before quantization.
///
/// # Returns
/// The image or a `LengthMismatch` error.
pub fn encode(
    values: &[f64],
    fingerprint: Fingerprint,
    range: NoiseRange,
) -> Result<NoiseImage, EncodeErr> {
    if values.len() != fingerprint.length() {
        return Err(EncodeErr::LengthMismatch {
            got: values.len(),
            expected: fingerprint.length(),
        });
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + values.len());
    fingerprint.write(&mut buf);
    buf.extend(values.iter().map(|&v| range.quantize(v)));

    let (width, height) = grid::dimensions(buf.len());
    let mut image = RgbImage::from_pixel(width, height, Rgb([PAD; CHANNELS]));

    let raw: &mut [u8] = &mut image;
    raw[..buf.len()].copy_from_slice(&buf);
    Ok(NoiseImage(image))
}

/// Recovers a noise vector from an image.
///
/// # Arguments
/// * `image` - The image.
/// * `fingerprint` - The fingerprint of the model the vector is meant for.
/// * `range` - The interval used when the image was encoded.
///
/// # Returns
/// Exactly `fingerprint.length()` values, or a `DecodeErr` if the image isn't a noise image,
/// belongs to another model or is truncated.
pub fn decode(
    image: &RgbImage,
    fingerprint: Fingerprint,
    range: NoiseRange,
) -> Result<Vec<f64>, DecodeErr> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeErr::Format("the image has zero dimensions".into()));
    }

    let bytes = image.as_raw();
    let found = Fingerprint::read(bytes)?;

    if found != fingerprint {
        return Err(DecodeErr::ModelMismatch {
            got: found,
            expected: fingerprint,
        });
    }

    let expected = fingerprint.length();
    let payload = &bytes[HEADER_LEN..];

    if payload.len() < expected {
        return Err(DecodeErr::LengthMismatch {
            got: payload.len(),
            expected,
        });
    }

    Ok(payload[..expected]
        .iter()
        .map(|&level| range.dequantize(level))
        .collect())
}

/// Parses an image container and recovers the noise vector it holds.
///
/// See [`decode`].
pub fn decode_png(
    bytes: &[u8],
    fingerprint: Fingerprint,
    range: NoiseRange,
) -> Result<Vec<f64>, DecodeErr> {
    let image = image::load_from_memory(bytes).map_err(|e| DecodeErr::Format(e.to_string()))?;
    decode(&image.to_rgb8(), fingerprint, range)
}

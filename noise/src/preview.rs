use image::{GrayImage, Luma, imageops::FilterType};

use crate::{NoiseErr, NoiseRange, Result};

/// The largest side in pixels a preview is rendered at.
pub const MAX_PREVIEW_SIDE: u32 = 4096;

/// Renders a noise vector as a grayscale square, one cell per value.
///
/// # Arguments
/// * `values` - The noise vector.
/// * `range` - The interval mapped onto black..white.
/// * `scale` - Side length in pixels of every cell.
///
/// # Returns
/// The rendered image or an `InvalidScale` error if `scale` is zero or the scaled side
/// would exceed `MAX_PREVIEW_SIDE`.
pub fn preview(values: &[f64], range: NoiseRange, scale: u32) -> Result<GrayImage> {
    let side = (values.len() as f64).sqrt().ceil().max(1.) as u32;

    let scaled = match side.checked_mul(scale) {
        Some(scaled) if scale > 0 && scaled <= MAX_PREVIEW_SIDE => scaled,
        _ => return Err(NoiseErr::InvalidScale),
    };

    let cells = GrayImage::from_fn(side, side, |x, y| {
        let i = (y * side + x) as usize;
        Luma([values.get(i).map_or(0, |&v| range.quantize(v))])
    });

    if scale == 1 {
        return Ok(cells);
    }

    Ok(image::imageops::resize(
        &cells,
        scaled,
        scaled,
        FilterType::Nearest,
    ))
}

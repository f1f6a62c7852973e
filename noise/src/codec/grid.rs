/// Bytes stored per pixel, one per RGB channel.
pub(super) const CHANNELS: usize = 3;

/// Picks the smallest near-square grid able to hold `bytes` bytes.
///
/// # Returns
/// The `(width, height)` of the grid in pixels.
pub(super) fn dimensions(bytes: usize) -> (u32, u32) {
    let pixels = bytes.div_ceil(CHANNELS).max(1);

    let mut width = (pixels as f64).sqrt().ceil() as usize;
    while width * width < pixels {
        width += 1;
    }

    let height = pixels.div_ceil(width);
    (width as u32, height as u32)
}

use crate::{NoiseErr, Result};

/// The quantization level `0.0` maps to in a symmetric range.
const MIDPOINT: u8 = 128;
const LEVELS: f64 = u8::MAX as f64;

/// The closed interval noise values are clamped into before being quantized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseRange {
    min: f64,
    max: f64,
}

impl Default for NoiseRange {
    /// Noise is drawn from a standard normal, three standard deviations cover almost all of it.
    fn default() -> Self {
        Self {
            min: -Self::SIGMA_BOUND,
            max: Self::SIGMA_BOUND,
        }
    }
}

impl NoiseRange {
    pub const SIGMA_BOUND: f64 = 3.;

    /// Creates a new `NoiseRange`.
    ///
    /// # Arguments
    /// * `min` - The inclusive lower bound.
    /// * `max` - The inclusive upper bound.
    ///
    /// # Returns
    /// An `InvalidRange` error if the bounds aren't finite or `min >= max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(NoiseErr::InvalidRange { min, max });
        }

        Ok(Self { min, max })
    }

    /// Creates the range `[-bound, bound]`.
    pub fn symmetric(bound: f64) -> Result<Self> {
        Self::new(-bound, bound)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// The maximum error introduced by a quantization round trip.
    pub fn tolerance(&self) -> f64 {
        (self.max - self.min) / LEVELS
    }

    /// Maps `value` into one of the 256 quantization levels.
    ///
    /// Values outside the range are clamped, NaN maps to the midpoint level.
    pub fn quantize(&self, value: f64) -> u8 {
        if value.is_nan() {
            return MIDPOINT;
        }

        let value = value.clamp(self.min, self.max);
        ((value - self.min) / (self.max - self.min) * LEVELS).round() as u8
    }

    /// Maps a quantization level back into the range.
    pub fn dequantize(&self, level: u8) -> f64 {
        self.min + f64::from(level) / LEVELS * (self.max - self.min)
    }
}

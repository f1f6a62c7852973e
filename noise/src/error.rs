use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::Fingerprint;

/// The result type for the noise store, range and preview.
pub type Result<T> = std::result::Result<T, NoiseErr>;

/// Errors raised while handling a noise vector.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseErr {
    LengthMismatch { got: usize, expected: usize },
    InvalidRange { min: f64, max: f64 },
    InvalidPerturbation(f64),
    InvalidScale,
}

impl Display for NoiseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseErr::LengthMismatch { got, expected } => write!(
                f,
                "noise length mismatch: got {got} values, expected {expected}"
            ),
            NoiseErr::InvalidRange { min, max } => {
                write!(f, "invalid noise range [{min}, {max}]")
            }
            NoiseErr::InvalidPerturbation(range) => {
                write!(f, "perturbation range must be finite and non negative, got {range}")
            }
            NoiseErr::InvalidScale => {
                f.write_str("preview scale must be at least 1 and keep the preview within bounds")
            }
        }
    }
}

impl Error for NoiseErr {}

/// Errors raised while encoding a noise vector into an image.
#[derive(Debug)]
pub enum EncodeErr {
    LengthMismatch { got: usize, expected: usize },
    Image(image::ImageError),
}

impl Display for EncodeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeErr::LengthMismatch { got, expected } => write!(
                f,
                "can't encode {got} values, the model expects {expected}"
            ),
            EncodeErr::Image(e) => write!(f, "image error: {e}"),
        }
    }
}

impl Error for EncodeErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeErr::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for EncodeErr {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

/// Errors raised while recovering a noise vector from an image.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeErr {
    /// The source isn't a noise image at all.
    Format(String),
    /// The image holds fewer values than the model needs.
    LengthMismatch { got: usize, expected: usize },
    /// The image was produced for a different model.
    ModelMismatch {
        got: Fingerprint,
        expected: Fingerprint,
    },
}

impl Display for DecodeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErr::Format(msg) => write!(f, "not a noise image: {msg}"),
            DecodeErr::LengthMismatch { got, expected } => write!(
                f,
                "the image holds {got} values, expected at least {expected}"
            ),
            DecodeErr::ModelMismatch { got, expected } => write!(
                f,
                "the image belongs to another model: got {got}, expected {expected}"
            ),
        }
    }
}

impl Error for DecodeErr {}

use std::{error::Error, fmt, io};

use noise::{DecodeErr, EncodeErr, NoiseErr};
use options::OptionErr;

/// The studio module's result type.
pub type Result<T> = std::result::Result<T, StudioErr>;

/// Every failure surfaced to the presentation layer.
#[derive(Debug)]
pub enum StudioErr {
    Option(OptionErr),
    Noise(NoiseErr),
    Decode(DecodeErr),
    Encode(EncodeErr),
    /// A model descriptor or catalog is unusable.
    Config(String),
    UnknownModel(String),
    Json(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for StudioErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudioErr::Option(e) => write!(f, "{e}"),
            StudioErr::Noise(e) => write!(f, "{e}"),
            StudioErr::Decode(e) => write!(f, "import error: {e}"),
            StudioErr::Encode(e) => write!(f, "export error: {e}"),
            StudioErr::Config(msg) => write!(f, "invalid config: {msg}"),
            StudioErr::UnknownModel(key) => write!(f, "unknown model '{key}'"),
            StudioErr::Json(e) => write!(f, "invalid JSON: {e}"),
            StudioErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for StudioErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StudioErr::Option(e) => Some(e),
            StudioErr::Noise(e) => Some(e),
            StudioErr::Decode(e) => Some(e),
            StudioErr::Encode(e) => Some(e),
            StudioErr::Json(e) => Some(e),
            StudioErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OptionErr> for StudioErr {
    fn from(value: OptionErr) -> Self {
        Self::Option(value)
    }
}

impl From<NoiseErr> for StudioErr {
    fn from(value: NoiseErr) -> Self {
        Self::Noise(value)
    }
}

impl From<DecodeErr> for StudioErr {
    fn from(value: DecodeErr) -> Self {
        Self::Decode(value)
    }
}

impl From<EncodeErr> for StudioErr {
    fn from(value: EncodeErr) -> Self {
        Self::Encode(value)
    }
}

impl From<serde_json::Error> for StudioErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<io::Error> for StudioErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

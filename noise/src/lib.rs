//! The latent noise vector of a generation model and its portable image encoding.

pub mod codec;
mod error;
mod preview;
mod range;
mod store;

pub use codec::{Fingerprint, NoiseImage, decode, decode_png, encode, write_png};
pub use error::{DecodeErr, EncodeErr, NoiseErr, Result};
pub use preview::{MAX_PREVIEW_SIDE, preview};
pub use range::NoiseRange;
pub use store::{NoiseStore, NoiseVector};

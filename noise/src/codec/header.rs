//! The reserved cells at the start of every noise image.
//!
//! Layout, big endian: `b"LNZ"`, format version, noise length as `u32`, model tag as `u32`.

use std::fmt;

use crate::DecodeErr;

const MAGIC: [u8; 3] = *b"LNZ";
const VERSION: u8 = 1;

pub(super) const HEADER_LEN: usize = 12;

/// Identifies the model a noise image was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    length: u32,
    model_tag: u32,
}

impl Fingerprint {
    /// Creates a new `Fingerprint`.
    ///
    /// # Arguments
    /// * `model_key` - The key of the model, it gets hashed into a 32 bit tag.
    /// * `length` - The noise length of the model.
    pub fn new(model_key: &str, length: usize) -> Self {
        Self {
            length: u32::try_from(length).unwrap_or(u32::MAX),
            model_tag: fnv1a(model_key.as_bytes()),
        }
    }

    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn model_tag(&self) -> u32 {
        self.model_tag
    }

    pub(super) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&self.length.to_be_bytes());
        buf.extend_from_slice(&self.model_tag.to_be_bytes());
    }

    /// Reads the fingerprint stored in the first `HEADER_LEN` bytes of `bytes`.
    pub(super) fn read(bytes: &[u8]) -> Result<Self, DecodeErr> {
        let Some(header) = bytes.get(..HEADER_LEN) else {
            return Err(DecodeErr::Format(format!(
                "{} bytes can't hold a {HEADER_LEN} byte header",
                bytes.len()
            )));
        };

        if header[..3] != MAGIC {
            return Err(DecodeErr::Format("missing noise header".into()));
        }

        if header[3] != VERSION {
            return Err(DecodeErr::Format(format!(
                "unsupported format version {}",
                header[3]
            )));
        }

        let word = |at: usize| {
            u32::from_be_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };

        Ok(Self {
            length: word(4),
            model_tag: word(8),
        })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:08x}", self.length, self.model_tag)
    }
}

/// 32 bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5, |hash: u32, &b| {
        (hash ^ u32::from(b)).wrapping_mul(0x0100_0193)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let fingerprint = Fingerprint::new("anime-v2", 128);

        let mut buf = Vec::new();
        fingerprint.write(&mut buf);

        assert_eq!(buf.len(), HEADER_LEN);
        assert_eq!(Fingerprint::read(&buf).unwrap(), fingerprint);
    }

    #[test]
    fn different_models_different_tags() {
        let a = Fingerprint::new("anime-v1", 128);
        let b = Fingerprint::new("anime-v2", 128);
        assert_ne!(a, b);
        assert_eq!(a.length(), b.length());
    }

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
    }

    #[test]
    fn rejects_foreign_bytes() {
        let err = Fingerprint::read(&[0; HEADER_LEN]).unwrap_err();
        assert!(matches!(err, DecodeErr::Format(_)));

        let err = Fingerprint::read(b"LNZ").unwrap_err();
        assert!(matches!(err, DecodeErr::Format(_)));

        let mut buf = Vec::new();
        Fingerprint::new("m", 1).write(&mut buf);
        buf[3] = 9;
        assert!(matches!(Fingerprint::read(&buf), Err(DecodeErr::Format(_))));
    }
}

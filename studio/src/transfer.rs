//! Noise image import and export.
//!
//! Reading a user selected file is the only slow step of an import. Every import takes a
//! `RequestToken` before reading, once the bytes are available the result is applied only if
//! no newer import (or model change) happened in the meantime.

use std::{path::Path, sync::atomic::Ordering};

use log::{info, warn};

use crate::{Result, Session, SessionEvent};

/// Identifies a noise import request, newer requests have greater tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// What happened to a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The decoded noise replaced the current vector.
    Applied,
    /// A newer request superseded this one, nothing changed.
    Stale,
}

impl Session {
    /// Starts a new noise import, superseding any import still in flight.
    pub fn begin_import(&self) -> RequestToken {
        RequestToken(self.imports.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Decodes the image bytes of an import and applies them.
    ///
    /// # Arguments
    /// * `token` - The token returned by `begin_import` for this request.
    /// * `bytes` - The raw bytes of the selected image.
    ///
    /// # Returns
    /// Whether the noise was applied, or a `Decode` error if the image isn't a noise image of
    /// the active model. Errors leave the current noise untouched.
    pub fn complete_import(&self, token: RequestToken, bytes: &[u8]) -> Result<ImportOutcome> {
        let model = self.model.lock();

        if self.imports.load(Ordering::Acquire) != token.0 {
            warn!(token = token.0; "discarding stale noise import");
            return Ok(ImportOutcome::Stale);
        }

        let values = noise::decode_png(bytes, model.fingerprint, model.range)?;
        self.noise.lock().set_values(values, false)?;
        drop(model);

        info!(token = token.0; "noise imported");
        self.notify(SessionEvent::NoiseChanged);
        Ok(ImportOutcome::Applied)
    }

    /// Imports noise from already materialized image bytes.
    pub fn import_noise_bytes(&self, bytes: &[u8]) -> Result<ImportOutcome> {
        let token = self.begin_import();
        self.complete_import(token, bytes)
    }

    /// Reads an image file and imports the noise it holds.
    ///
    /// # Arguments
    /// * `path` - The path of the image.
    ///
    /// # Returns
    /// `Stale` if another import started while the file was being read.
    pub async fn import_noise_file(&self, path: impl AsRef<Path>) -> Result<ImportOutcome> {
        let token = self.begin_import();
        let bytes = tokio::fs::read(path.as_ref()).await?;
        self.complete_import(token, &bytes)
    }

    /// Encodes the current noise vector as a PNG noise image.
    pub fn export_noise_png(&self) -> Result<Vec<u8>> {
        let model = self.model.lock();
        let image = noise::encode(self.noise.lock().values(), model.fingerprint, model.range)?;
        drop(model);

        Ok(image.to_png()?)
    }

    /// Writes the current noise vector as a PNG noise image.
    pub async fn export_noise_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let png = self.export_noise_png()?;
        tokio::fs::write(path.as_ref(), png).await?;

        info!("noise exported to {}", path.as_ref().display());
        Ok(())
    }

    /// Renders a grayscale preview of the current noise vector as PNG.
    ///
    /// # Arguments
    /// * `scale` - Side length in pixels of every noise cell.
    pub fn noise_preview_png(&self, scale: u32) -> Result<Vec<u8>> {
        let model = self.model.lock();
        let image = noise::preview(self.noise.lock().values(), model.range, scale)?;
        drop(model);

        Ok(noise::write_png(image)?)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::atomic::AtomicBool, thread};

    use noise::DecodeErr;

    use super::*;
    use crate::{ModelDescriptor, StudioErr};

    fn create_test_session(key: &str, noise_length: usize) -> Session {
        let json = format!(r#"{{ "key": "{key}", "noise_length": {noise_length} }}"#);
        Session::new(&ModelDescriptor::from_json(&json).unwrap()).unwrap()
    }

    #[test]
    fn export_then_import() {
        let session = create_test_session("m", 6);
        let values = vec![-2., -1., 0., 0.5, 1., 2.];
        session.set_noise(values.clone(), true).unwrap();

        let png = session.export_noise_png().unwrap();
        session.set_noise(vec![0.; 6], true).unwrap();

        assert_eq!(session.import_noise_bytes(&png).unwrap(), ImportOutcome::Applied);

        let noise = session.noise();
        assert!(!noise.random);
        for (a, b) in values.iter().zip(&noise.values) {
            assert!((a - b).abs() <= session.noise_range().tolerance());
        }
    }

    #[test]
    fn stale_import_is_discarded() {
        let session = create_test_session("m", 4);
        session.set_noise(vec![1.; 4], false).unwrap();
        let png = session.export_noise_png().unwrap();
        session.set_noise(vec![0.; 4], true).unwrap();

        let first = session.begin_import();
        let second = session.begin_import();
        assert!(second > first);

        assert_eq!(session.complete_import(first, &png).unwrap(), ImportOutcome::Stale);
        assert_eq!(session.noise().values, [0.; 4]);

        assert_eq!(session.complete_import(second, &png).unwrap(), ImportOutcome::Applied);
        assert!(!session.noise().random);
    }

    #[test]
    fn model_change_invalidates_imports() {
        let session = create_test_session("m", 4);
        let png = session.export_noise_png().unwrap();

        let token = session.begin_import();
        let other = ModelDescriptor::from_json(r#"{ "key": "m", "noise_length": 4 }"#).unwrap();
        session.change_model(&other).unwrap();

        assert_eq!(session.complete_import(token, &png).unwrap(), ImportOutcome::Stale);
    }

    #[test]
    fn foreign_image_is_rejected() {
        let producer = create_test_session("other", 4);
        let png = producer.export_noise_png().unwrap();

        let session = create_test_session("m", 4);
        session.set_noise(vec![1.; 4], false).unwrap();

        let err = session.import_noise_bytes(&png).unwrap_err();
        assert!(matches!(err, StudioErr::Decode(DecodeErr::ModelMismatch { .. })));
        assert_eq!(session.noise().values, [1.; 4]);
    }

    #[test]
    fn export_pairs_fingerprint_with_its_own_noise() {
        let a = ModelDescriptor::from_json(
            r#"{ "key": "a", "noise_length": 4, "default_noise": [1, 1, 1, 1] }"#,
        )
        .unwrap();
        let b = ModelDescriptor::from_json(
            r#"{ "key": "b", "noise_length": 4, "default_noise": [-1, -1, -1, -1] }"#,
        )
        .unwrap();

        let session = Session::new(&a).unwrap();
        let range = session.noise_range();
        let stop = AtomicBool::new(false);

        let exported: Vec<_> = thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    session.change_model(&b).ok();
                    session.change_model(&a).ok();
                }
            });

            let exported = (0..500).map(|_| session.export_noise_png()).collect();
            stop.store(true, Ordering::Relaxed);
            exported
        });

        for png in exported {
            let png = png.unwrap();

            let (values, expected) = match noise::decode_png(&png, a.fingerprint(), range) {
                Ok(values) => (values, 1.),
                Err(_) => (noise::decode_png(&png, b.fingerprint(), range).unwrap(), -1.),
            };
            for v in values {
                assert!((v - expected).abs() <= range.tolerance());
            }
        }
    }

    #[test]
    fn preview_is_png() {
        let session = create_test_session("m", 9);

        let png = session.noise_preview_png(2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(matches!(
            session.noise_preview_png(0),
            Err(StudioErr::Noise(_))
        ));
    }
}

use log::info;
use options::{OptionErr, RESERVED_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, Session, SessionEvent, StudioErr};

/// The noise vector inside an options payload.
#[derive(Debug, Serialize, Deserialize)]
struct NoiseEntry {
    #[serde(default)]
    random: bool,
    #[serde(default)]
    value: Option<Vec<f64>>,
}

/// The outcome of a best-effort payload import.
#[derive(Debug, Default)]
pub struct PayloadReport {
    pub applied: Vec<String>,
    pub failures: Vec<(String, StudioErr)>,
}

impl PayloadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Session {
    /// Serializes every option plus the noise vector into a JSON document.
    pub fn export_payload(&self) -> Result<String> {
        let mut doc = Map::new();

        for (key, value) in self.options() {
            doc.insert(key, serde_json::to_value(value)?);
        }

        let noise = self.noise();
        let entry = NoiseEntry {
            random: noise.random,
            value: Some(noise.values),
        };
        doc.insert(RESERVED_KEY.to_string(), serde_json::to_value(entry)?);

        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Applies a JSON document produced by `export_payload`, entry by entry.
    ///
    /// # Arguments
    /// * `json` - The document.
    ///
    /// # Returns
    /// A report of the applied and failed keys, or a `Json` error if `json` isn't an object.
    pub fn import_payload(&self, json: &str) -> Result<PayloadReport> {
        let mut doc: Map<String, Value> = serde_json::from_str(json)?;
        let noise_entry = doc.remove(RESERVED_KEY);

        let options = self.options.lock().import(doc);
        for key in &options.applied {
            self.notify(SessionEvent::OptionChanged(key.clone()));
        }

        let mut report = PayloadReport {
            applied: options.applied,
            failures: options
                .failures
                .into_iter()
                .map(|e| (e.key().unwrap_or_default().to_string(), StudioErr::Option(e)))
                .collect(),
        };

        if let Some(raw) = noise_entry {
            match self.import_noise_entry(raw) {
                Ok(()) => report.applied.push(RESERVED_KEY.to_string()),
                Err(e) => report.failures.push((RESERVED_KEY.to_string(), e)),
            }
        }

        info!(
            applied = report.applied.len(),
            failed = report.failures.len();
            "payload imported"
        );
        Ok(report)
    }

    fn import_noise_entry(&self, raw: Value) -> Result<()> {
        let entry: NoiseEntry =
            serde_json::from_value(raw).map_err(|e| OptionErr::InvalidValue {
                key: RESERVED_KEY.to_string(),
                reason: e.to_string(),
            })?;

        match entry.value {
            Some(values) => self.set_noise(values, entry.random),
            None => {
                self.set_noise_random(entry.random);
                Ok(())
            }
        }
    }
}

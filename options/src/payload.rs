//! Import and export of option snapshots as JSON documents.
//!
//! A document maps every option key to `{"random": bool, "value": <number | [numbers]>}`.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{OptionErr, OptionModel, OptionValue, Result, value::OptionInput};

/// A single entry of an imported document.
#[derive(Debug, Deserialize)]
pub struct PayloadEntry {
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub value: Option<OptionInput>,
}

/// The outcome of a best-effort import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub applied: Vec<String>,
    pub failures: Vec<OptionErr>,
}

impl ImportReport {
    /// Whether every entry of the document was applied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl OptionModel {
    /// Takes a snapshot of every option, keyed by the option's key.
    pub fn export(&self) -> BTreeMap<String, OptionValue> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    /// Applies every entry of a parsed document through `set_option`.
    ///
    /// A failing entry is recorded in the report and doesn't stop the remaining ones.
    ///
    /// # Arguments
    /// * `doc` - The document's top level object.
    pub fn import(&mut self, doc: Map<String, Value>) -> ImportReport {
        let mut report = ImportReport::default();

        for (key, raw) in doc {
            match self.import_entry(&key, raw) {
                Ok(()) => report.applied.push(key),
                Err(e) => {
                    warn!("skipping option on import: {e}");
                    report.failures.push(e);
                }
            }
        }

        debug!(
            applied = report.applied.len(),
            failed = report.failures.len();
            "options imported"
        );
        report
    }

    /// Parses and applies a JSON document.
    ///
    /// # Returns
    /// A `MalformedPayload` error if `json` isn't a JSON object, otherwise the import report.
    pub fn import_str(&mut self, json: &str) -> Result<ImportReport> {
        let doc: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| OptionErr::MalformedPayload(e.to_string()))?;

        Ok(self.import(doc))
    }

    fn import_entry(&mut self, key: &str, raw: Value) -> Result<()> {
        self.registry().get(key)?;

        let entry: PayloadEntry =
            serde_json::from_value(raw).map_err(|e| OptionErr::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        self.set_option(key, entry.random, entry.value)?;
        Ok(())
    }
}

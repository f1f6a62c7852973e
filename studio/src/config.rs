//! Model descriptors as shipped in the model configuration.
//!
//! ```json
//! {
//!   "key": "anime-v2",
//!   "noise_length": 128,
//!   "noise_range": { "min": -3.0, "max": 3.0 },
//!   "options": [
//!     { "key": "blush", "type": "binary", "default": 1 },
//!     { "key": "hair_color", "type": "multiple", "options": ["blonde", "brown", "black"] },
//!     { "key": "year", "type": "continuous", "min": 2005, "max": 2015, "step": 1, "default": 2012 }
//!   ]
//! }
//! ```

use std::{collections::HashSet, path::Path};

use noise::{Fingerprint, NoiseRange};
use options::{OptionInput, OptionKind, OptionRegistry, OptionSpec};
use serde::Deserialize;

use crate::{Result, StudioErr};

fn default_step() -> f64 {
    1.
}

/// A single option as declared in a descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionDraft {
    Binary {
        key: String,
        default: Option<OptionInput>,
    },
    Multiple {
        key: String,
        /// The choice labels, only their count matters here.
        #[serde(default)]
        options: Vec<String>,
        count: Option<usize>,
        default: Option<OptionInput>,
    },
    Continuous {
        key: String,
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
        default: Option<OptionInput>,
    },
}

impl OptionDraft {
    /// Validates the draft into an `OptionSpec`.
    pub fn into_spec(self) -> options::Result<OptionSpec> {
        match self {
            OptionDraft::Binary { key, default } => {
                OptionSpec::new(key, OptionKind::Binary, default)
            }
            OptionDraft::Multiple {
                key,
                options,
                count,
                default,
            } => {
                let count = count.unwrap_or(options.len());
                OptionSpec::new(key, OptionKind::Multiple { count }, default)
            }
            OptionDraft::Continuous {
                key,
                min,
                max,
                step,
                default,
            } => OptionSpec::new(key, OptionKind::Continuous { min, max, step }, default),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeDraft {
    pub min: f64,
    pub max: f64,
}

/// Everything the session needs to know about a generation model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptor {
    pub key: String,
    pub noise_length: usize,
    #[serde(default)]
    pub noise_range: Option<RangeDraft>,
    #[serde(default)]
    pub default_noise: Option<Vec<f64>>,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

impl ModelDescriptor {
    /// Parses a descriptor from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the option registry of this model.
    ///
    /// # Returns
    /// An `Option` error if any declared option is malformed.
    pub fn registry(&self) -> Result<OptionRegistry> {
        let specs = self
            .options
            .iter()
            .cloned()
            .map(OptionDraft::into_spec)
            .collect::<options::Result<Vec<_>>>()?;

        Ok(OptionRegistry::new(specs)?)
    }

    /// The quantization range of this model's noise, `[-3, 3]` if not declared.
    pub fn noise_range(&self) -> Result<NoiseRange> {
        match self.noise_range {
            Some(RangeDraft { min, max }) => Ok(NoiseRange::new(min, max)?),
            None => Ok(NoiseRange::default()),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(&self.key, self.noise_length)
    }

    /// Checks the descriptor-level invariants.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(StudioErr::Config("model key must not be empty".into()));
        }

        if self.noise_length == 0 {
            return Err(StudioErr::Config(format!(
                "model '{}' must have a noise length of at least 1",
                self.key
            )));
        }

        if u32::try_from(self.noise_length).is_err() {
            return Err(StudioErr::Config(format!(
                "model '{}' has a noise length too large to encode",
                self.key
            )));
        }

        Ok(())
    }
}

/// The list of models the user can pick from.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub models: Vec<ModelDescriptor>,
}

impl Catalog {
    /// Parses a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;

        if catalog.models.is_empty() {
            return Err(StudioErr::Config("the catalog has no models".into()));
        }

        let mut keys = HashSet::with_capacity(catalog.models.len());
        for model in &catalog.models {
            if !keys.insert(model.key.as_str()) {
                return Err(StudioErr::Config(format!(
                    "model '{}' is declared more than once",
                    model.key
                )));
            }
        }

        Ok(catalog)
    }

    /// Reads and parses a catalog file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Looks up a model by key.
    pub fn get(&self, key: &str) -> Result<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.key == key)
            .ok_or_else(|| StudioErr::UnknownModel(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use options::Encoded;

    use super::*;

    const DESCRIPTOR: &str = r#"{
        "key": "anime-v2",
        "noise_length": 128,
        "options": [
            { "key": "blush", "type": "binary", "default": 0 },
            { "key": "hair_color", "type": "multiple", "options": ["blonde", "brown", "black"], "default": 1 },
            { "key": "year", "type": "continuous", "min": 2005, "max": 2015, "default": 2012 }
        ]
    }"#;

    #[test]
    fn parse_descriptor() {
        let descriptor = ModelDescriptor::from_json(DESCRIPTOR).unwrap();
        descriptor.validate().unwrap();

        let registry = descriptor.registry().unwrap();
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.get("blush").unwrap().default(), &Encoded::Binary(1));
        assert_eq!(
            registry.get("hair_color").unwrap().kind(),
            OptionKind::Multiple { count: 3 }
        );
        assert_eq!(
            registry.get("year").unwrap().kind(),
            OptionKind::Continuous {
                min: 2005.,
                max: 2015.,
                step: 1.
            }
        );
        assert_eq!(descriptor.noise_range().unwrap(), NoiseRange::default());
    }

    #[test]
    fn explicit_count_wins() {
        let draft: OptionDraft =
            serde_json::from_str(r#"{ "key": "eyes", "type": "multiple", "count": 4 }"#).unwrap();

        let spec = draft.into_spec().unwrap();
        assert_eq!(spec.kind(), OptionKind::Multiple { count: 4 });
    }

    #[test]
    fn invalid_option_is_reported() {
        let json = r#"{
            "key": "m",
            "noise_length": 4,
            "options": [{ "key": "solo", "type": "multiple", "options": ["only"] }]
        }"#;

        let descriptor = ModelDescriptor::from_json(json).unwrap();
        assert!(matches!(descriptor.registry(), Err(StudioErr::Option(_))));
    }

    #[test]
    fn zero_noise_length() {
        let descriptor =
            ModelDescriptor::from_json(r#"{ "key": "m", "noise_length": 0 }"#).unwrap();
        assert!(matches!(descriptor.validate(), Err(StudioErr::Config(_))));
    }

    #[test]
    fn catalog_lookup() {
        let json = format!(r#"{{ "models": [{DESCRIPTOR}] }}"#);
        let catalog = Catalog::from_json(&json).unwrap();

        assert_eq!(catalog.keys().collect::<Vec<_>>(), ["anime-v2"]);
        assert!(catalog.get("anime-v2").is_ok());
        assert!(matches!(catalog.get("nope"), Err(StudioErr::UnknownModel(_))));
    }

    #[test]
    fn duplicate_model_keys() {
        let json = r#"{ "models": [
            { "key": "m", "noise_length": 4 },
            { "key": "m", "noise_length": 8 }
        ] }"#;

        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, StudioErr::Config(msg) if msg.contains("'m'")));
    }
}

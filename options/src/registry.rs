use std::collections::HashMap;

use crate::{OptionErr, OptionSpec, Result};

/// The set of options a generation model exposes, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    specs: Vec<OptionSpec>,
    index: HashMap<String, usize>,
}

impl OptionRegistry {
    /// Creates a new `OptionRegistry`.
    ///
    /// # Arguments
    /// * `specs` - The option specs, their order is kept.
    ///
    /// # Returns
    /// A `DuplicateOption` error if two specs share the same key.
    pub fn new(specs: Vec<OptionSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());

        for (i, spec) in specs.iter().enumerate() {
            if index.insert(spec.key().to_string(), i).is_some() {
                return Err(OptionErr::DuplicateOption {
                    key: spec.key().to_string(),
                });
            }
        }

        Ok(Self { specs, index })
    }

    /// Replaces every registered spec, on failure the current specs are kept.
    ///
    /// # Arguments
    /// * `specs` - The new option specs.
    pub fn register(&mut self, specs: Vec<OptionSpec>) -> Result<()> {
        *self = Self::new(specs)?;
        Ok(())
    }

    /// Looks up the spec for `key`.
    pub fn get(&self, key: &str) -> Result<&OptionSpec> {
        self.position(key).map(|i| &self.specs[i])
    }

    /// Returns the declaration position of `key`.
    pub(crate) fn position(&self, key: &str) -> Result<usize> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| OptionErr::UnknownOption { key: key.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

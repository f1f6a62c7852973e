use log::debug;

use crate::{
    OptionErr, OptionRegistry, Result,
    value::{OptionInput, OptionValue},
};

/// Holds the current value of every option of the active generation model.
///
/// Values are stored in the registry's declaration order and are always in their
/// canonical encoding, a failed mutation never leaves a partial write behind.
#[derive(Debug, Clone)]
pub struct OptionModel {
    registry: OptionRegistry,
    values: Vec<OptionValue>,
}

impl OptionModel {
    /// Creates a new `OptionModel` with every option at its default.
    ///
    /// # Arguments
    /// * `registry` - The options exposed by the active model.
    pub fn new(registry: OptionRegistry) -> Self {
        let values = Self::defaults(&registry);
        Self { registry, values }
    }

    fn defaults(registry: &OptionRegistry) -> Vec<OptionValue> {
        registry
            .iter()
            .map(|spec| OptionValue::new(false, spec.default().clone()))
            .collect()
    }

    /// Discards every value and rebuilds the model for a new generation model.
    ///
    /// # Arguments
    /// * `registry` - The options exposed by the new model.
    pub fn replace_for_model(&mut self, registry: OptionRegistry) {
        debug!(options = registry.len(); "replacing option model");
        self.values = Self::defaults(&registry);
        self.registry = registry;
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Sets the random flag and optionally the value of an option.
    ///
    /// # Arguments
    /// * `key` - The option's key.
    /// * `random` - Whether the generator should draw this option at random.
    /// * `value` - The new value, `None` keeps the stored one.
    ///
    /// # Returns
    /// The stored value, `UnknownOption` if the key isn't registered or `InvalidValue`
    /// if `value` doesn't fit the option's kind.
    pub fn set_option(
        &mut self,
        key: &str,
        random: bool,
        value: Option<OptionInput>,
    ) -> Result<&OptionValue> {
        let i = self.registry.position(key)?;
        let spec = self.registry.get(key)?;

        let encoded = match value {
            Some(input) => spec
                .kind()
                .normalize(&input)
                .map_err(|reason| OptionErr::InvalidValue {
                    key: key.to_string(),
                    reason,
                })?,
            None => self.values[i].encoded().clone(),
        };

        debug!(key = key, random = random; "option changed");
        self.values[i] = OptionValue::new(random, encoded);
        Ok(&self.values[i])
    }

    /// Returns the current value of an option.
    pub fn get_option(&self, key: &str) -> Result<&OptionValue> {
        self.registry.position(key).map(|i| &self.values[i])
    }

    /// Restores every option to its declared default with the random flag off.
    pub fn reset_all(&mut self) {
        debug!("resetting every option");
        self.values = Self::defaults(&self.registry);
    }

    /// Iterates over every option key and value in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.registry
            .iter()
            .map(|spec| spec.key())
            .zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Encoded, OptionKind, OptionSpec};

    fn create_test_model() -> OptionModel {
        let specs = vec![
            OptionSpec::new("blush", OptionKind::Binary, Some(1.into())).unwrap(),
            OptionSpec::new("hair", OptionKind::Multiple { count: 3 }, Some(2usize.into()))
                .unwrap(),
            OptionSpec::new(
                "year",
                OptionKind::Continuous {
                    min: 2005.,
                    max: 2015.,
                    step: 1.,
                },
                Some(2012.into()),
            )
            .unwrap(),
        ];

        OptionModel::new(OptionRegistry::new(specs).unwrap())
    }

    #[test]
    fn starts_at_defaults() {
        let model = create_test_model();

        let hair = model.get_option("hair").unwrap();
        assert!(!hair.random());
        assert_eq!(hair.encoded(), &Encoded::Multiple(vec![-1, -1, 1]));
    }

    #[test]
    fn binary_inputs_are_canonical() {
        let mut model = create_test_model();

        for (input, stored) in [(-1, -1), (0, 1), (1, 1)] {
            model.set_option("blush", false, Some(input.into())).unwrap();
            let value = model.get_option("blush").unwrap();
            assert_eq!(value.encoded(), &Encoded::Binary(stored), "input {input}");
        }
    }

    #[test]
    fn index_expands_to_one_hot() {
        let mut model = create_test_model();

        for i in 0..3usize {
            model.set_option("hair", false, Some(i.into())).unwrap();

            let value = model.get_option("hair").unwrap();
            let Encoded::Multiple(hot) = value.encoded() else {
                panic!("expected a one-hot vector");
            };

            assert_eq!(hot.len(), 3);
            assert_eq!(value.encoded().selected(), Some(i));
            assert_eq!(hot.iter().filter(|&&v| v == 1).count(), 1);
        }
    }

    #[test]
    fn malformed_one_hot_keeps_prior_value() {
        let mut model = create_test_model();
        model.set_option("hair", false, Some(1usize.into())).unwrap();

        let bad_inputs: [Vec<i32>; 3] = [vec![1, 1, -1], vec![-1, -1, -1], vec![-1, 1]];
        for input in bad_inputs {
            let err = model.set_option("hair", true, Some(input.into())).unwrap_err();
            assert!(matches!(err, OptionErr::InvalidValue { .. }));

            let value = model.get_option("hair").unwrap();
            assert!(!value.random());
            assert_eq!(value.encoded(), &Encoded::Multiple(vec![-1, 1, -1]));
        }
    }

    #[test]
    fn continuous_is_clamped() {
        let mut model = create_test_model();

        for (input, stored) in [
            (2005., 2005.),
            (2015., 2015.),
            (1990., 2005.),
            (3000., 2015.),
            (2010.5, 2010.5),
            (f64::INFINITY, 2015.),
        ] {
            model.set_option("year", false, Some(input.into())).unwrap();
            let value = model.get_option("year").unwrap();
            assert_eq!(value.encoded(), &Encoded::Continuous(stored));
        }
    }

    #[test]
    fn missing_value_only_flips_random() {
        let mut model = create_test_model();
        model.set_option("year", false, Some(2008.into())).unwrap();

        let value = model.set_option("year", true, None).unwrap();
        assert!(value.random());
        assert_eq!(value.encoded(), &Encoded::Continuous(2008.));
    }

    #[test]
    fn unknown_option() {
        let mut model = create_test_model();

        let err = model.set_option("eyes", false, None).unwrap_err();
        assert_eq!(err, OptionErr::UnknownOption { key: "eyes".into() });
        assert!(model.get_option("eyes").is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut model = create_test_model();
        model.set_option("blush", true, Some((-1).into())).unwrap();
        model.set_option("hair", true, Some(0usize.into())).unwrap();
        model.set_option("year", true, Some(2006.into())).unwrap();

        model.reset_all();

        let fresh = create_test_model();
        for ((key, value), (_, expected)) in model.iter().zip(fresh.iter()) {
            assert!(!value.random(), "{key}");
            assert_eq!(value, expected, "{key}");
        }
    }

    #[test]
    fn replace_for_model_discards_values() {
        let mut model = create_test_model();
        model.set_option("blush", true, None).unwrap();

        let spec = OptionSpec::new("smile", OptionKind::Binary, None).unwrap();
        model.replace_for_model(OptionRegistry::new(vec![spec]).unwrap());

        assert!(model.get_option("blush").is_err());
        assert_eq!(
            model.get_option("smile").unwrap().encoded(),
            &Encoded::Binary(-1)
        );
    }
}

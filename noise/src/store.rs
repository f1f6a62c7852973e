use log::{debug, warn};
use rand::{Rng, distr::Uniform};
use rand_distr::{Distribution, StandardNormal};

use crate::{NoiseErr, Result};

/// A snapshot of the noise store.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseVector {
    pub random: bool,
    pub values: Vec<f64>,
}

/// Holds the latent noise vector of the active generation model.
///
/// The length is fixed for the lifetime of a model, only `replace_for_model` changes it.
#[derive(Debug, Clone)]
pub struct NoiseStore {
    random: bool,
    values: Vec<f64>,
}

impl NoiseStore {
    /// Creates a new `NoiseStore` flagged as random.
    ///
    /// # Arguments
    /// * `length` - The noise length of the model.
    /// * `defaults` - Optional starting values, zeros if `None`.
    pub fn new(length: usize, defaults: Option<Vec<f64>>) -> Self {
        Self {
            random: true,
            values: Self::fit(length, defaults),
        }
    }

    /// Truncates or zero pads `defaults` to `length`.
    fn fit(length: usize, defaults: Option<Vec<f64>>) -> Vec<f64> {
        let mut values = defaults.unwrap_or_default();

        if !values.is_empty() && values.len() != length {
            warn!(
                got = values.len(),
                expected = length;
                "default noise doesn't match the model, resizing"
            );
        }

        values.resize(length, 0.);
        values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_random(&self) -> bool {
        self.random
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn snapshot(&self) -> NoiseVector {
        NoiseVector {
            random: self.random,
            values: self.values.clone(),
        }
    }

    /// Flips the random flag, the stored values are kept.
    pub fn set_random(&mut self, random: bool) {
        self.random = random;
    }

    /// Replaces the stored values.
    ///
    /// # Arguments
    /// * `values` - The new values.
    /// * `random` - The new random flag.
    ///
    /// # Returns
    /// A `LengthMismatch` error if `values` isn't exactly as long as the store.
    pub fn set_values(&mut self, values: Vec<f64>, random: bool) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(NoiseErr::LengthMismatch {
                got: values.len(),
                expected: self.values.len(),
            });
        }

        self.values = values;
        self.random = random;
        Ok(())
    }

    /// Discards the current vector and starts over for a new generation model.
    ///
    /// # Arguments
    /// * `length` - The noise length of the new model.
    /// * `defaults` - Optional starting values, resized to `length` if needed.
    pub fn replace_for_model(&mut self, length: usize, defaults: Option<Vec<f64>>) {
        debug!(length = length; "replacing noise vector");
        *self = Self::new(length, defaults);
    }

    /// Returns the values the generator should consume.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// A fresh standard normal draw if the store is random, otherwise the stored values.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        if self.random {
            Self::draw(rng, self.values.len())
        } else {
            self.values.clone()
        }
    }

    /// Stores a fresh standard normal draw, the random flag is kept.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.values = Self::draw(rng, self.values.len());
    }

    /// Jitters every value with uniform noise.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `range` - Every value moves by at most this much in either direction.
    ///
    /// # Returns
    /// An `InvalidPerturbation` error if `range` is negative or not finite.
    pub fn perturb<R: Rng>(&mut self, rng: &mut R, range: f64) -> Result<()> {
        if !range.is_finite() || range < 0. {
            return Err(NoiseErr::InvalidPerturbation(range));
        }

        // The sampler needs the full width `2 * range` to be finite too.
        let jitter = Uniform::new_inclusive(-range, range)
            .map_err(|_| NoiseErr::InvalidPerturbation(range))?;

        self.values
            .iter_mut()
            .for_each(|v| *v += jitter.sample(rng));

        Ok(())
    }

    fn draw<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| StandardNormal.sample(rng)).collect()
    }
}

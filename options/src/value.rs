use serde::{Deserialize, Serialize};

/// A value as it arrives from the outside world: a selector, a slider or an imported payload.
///
/// Numbers are either a binary toggle, a selected index or a continuous value depending on
/// the option kind; sequences are full one-hot vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionInput {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl From<f64> for OptionInput {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<i32> for OptionInput {
    fn from(value: i32) -> Self {
        Self::Scalar(value as f64)
    }
}

impl From<usize> for OptionInput {
    fn from(index: usize) -> Self {
        Self::Scalar(index as f64)
    }
}

impl From<Vec<i32>> for OptionInput {
    fn from(values: Vec<i32>) -> Self {
        Self::Vector(values.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<f64>> for OptionInput {
    fn from(values: Vec<f64>) -> Self {
        Self::Vector(values)
    }
}

/// The canonical stored encoding of an option.
///
/// Binary options hold `-1` or `+1`, multiple options a one-hot vector of `-1`/`+1` and
/// continuous options a value already clamped into the option's bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Encoded {
    Binary(i8),
    Multiple(Vec<i8>),
    Continuous(f64),
}

impl Encoded {
    /// Builds the one-hot vector of `count` entries with `+1` at `index`.
    pub(crate) fn one_hot(count: usize, index: usize) -> Self {
        let hot = (0..count).map(|i| if i == index { 1 } else { -1 }).collect();
        Self::Multiple(hot)
    }

    /// Returns the selected index of a multiple option.
    pub fn selected(&self) -> Option<usize> {
        match self {
            Encoded::Multiple(hot) => hot.iter().position(|&v| v == 1),
            _ => None,
        }
    }
}

/// The current state of a single option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionValue {
    random: bool,
    #[serde(rename = "value")]
    encoded: Encoded,
}

impl OptionValue {
    pub(crate) fn new(random: bool, encoded: Encoded) -> Self {
        Self { random, encoded }
    }

    /// Whether the generator should draw this option at random, ignoring `encoded`.
    pub fn random(&self) -> bool {
        self.random
    }

    pub fn encoded(&self) -> &Encoded {
        &self.encoded
    }
}

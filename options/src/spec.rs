use crate::{
    OptionErr, Result,
    value::{Encoded, OptionInput},
};

/// The key reserved for the noise vector inside an exported payload.
pub const RESERVED_KEY: &str = "noise";

/// The kind of a tunable option, it dictates its canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionKind {
    Binary,
    Multiple { count: usize },
    Continuous { min: f64, max: f64, step: f64 },
}

impl OptionKind {
    /// Checks the kind's own invariants.
    ///
    /// # Returns
    /// A human readable reason if the kind is malformed.
    fn check(&self) -> std::result::Result<(), String> {
        match *self {
            OptionKind::Binary => Ok(()),
            OptionKind::Multiple { count } if count < 2 => {
                Err(format!("a multiple option needs at least 2 choices, got {count}"))
            }
            OptionKind::Multiple { .. } => Ok(()),
            OptionKind::Continuous { min, max, step } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(format!("invalid bounds [{min}, {max}]"));
                }

                if !step.is_finite() || step <= 0. {
                    return Err(format!("step must be positive, got {step}"));
                }

                Ok(())
            }
        }
    }

    /// The encoding used when a descriptor doesn't declare a default.
    fn fallback(&self) -> Encoded {
        match *self {
            OptionKind::Binary => Encoded::Binary(-1),
            OptionKind::Multiple { count } => Encoded::one_hot(count, 0),
            OptionKind::Continuous { min, .. } => Encoded::Continuous(min),
        }
    }

    /// Validates `input` against this kind and returns its canonical encoding.
    ///
    /// # Arguments
    /// * `input` - The external value.
    ///
    /// # Returns
    /// The canonical encoding or the reason why `input` was rejected.
    pub(crate) fn normalize(&self, input: &OptionInput) -> std::result::Result<Encoded, String> {
        match (*self, input) {
            (OptionKind::Binary, OptionInput::Scalar(v)) => {
                // 0 is the selector's index for "on".
                if *v == -1. {
                    Ok(Encoded::Binary(-1))
                } else if *v == 0. || *v == 1. {
                    Ok(Encoded::Binary(1))
                } else {
                    Err(format!("expected -1, 0 or 1, got {v}"))
                }
            }
            (OptionKind::Binary, OptionInput::Vector(_)) => {
                Err("a binary option takes a single number".into())
            }
            (OptionKind::Multiple { count }, OptionInput::Scalar(index)) => {
                if index.fract() != 0. || *index < 0. || *index >= count as f64 {
                    return Err(format!("index {index} is out of range [0, {count})"));
                }

                Ok(Encoded::one_hot(count, *index as usize))
            }
            (OptionKind::Multiple { count }, OptionInput::Vector(hot)) => {
                if hot.len() != count {
                    return Err(format!(
                        "one-hot length mismatch, got {} and expected {count}",
                        hot.len()
                    ));
                }

                if hot.iter().any(|&v| v != 1. && v != -1.) {
                    return Err("one-hot entries must be -1 or 1".into());
                }

                let ones = hot.iter().filter(|&&v| v == 1.).count();
                if ones != 1 {
                    return Err(format!("expected exactly one selected entry, got {ones}"));
                }

                Ok(Encoded::Multiple(hot.iter().map(|&v| v as i8).collect()))
            }
            (OptionKind::Continuous { min, max, .. }, OptionInput::Scalar(v)) => {
                if v.is_nan() {
                    return Err("NaN can't be clamped".into());
                }

                Ok(Encoded::Continuous(v.clamp(min, max)))
            }
            (OptionKind::Continuous { .. }, OptionInput::Vector(_)) => {
                Err("a continuous option takes a single number".into())
            }
        }
    }
}

/// The static description of a configurable option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    key: String,
    kind: OptionKind,
    default: Encoded,
}

impl OptionSpec {
    /// Creates a new `OptionSpec`.
    ///
    /// # Arguments
    /// * `key` - The unique identifier of the option.
    /// * `kind` - The kind of the option.
    /// * `default` - The declared default, `None` falls back to the kind's own default.
    ///
    /// # Returns
    /// An `InvalidSpec` error if the kind or the default break the option's invariants.
    pub fn new(
        key: impl Into<String>,
        kind: OptionKind,
        default: Option<OptionInput>,
    ) -> Result<Self> {
        let key = key.into();
        let invalid = |reason: String| OptionErr::InvalidSpec {
            key: key.clone(),
            reason,
        };

        if key.is_empty() {
            return Err(invalid("the key can't be empty".into()));
        }

        if key == RESERVED_KEY {
            return Err(invalid(format!("'{RESERVED_KEY}' is a reserved key")));
        }

        kind.check().map_err(invalid)?;

        let default = match default {
            Some(input) => kind
                .normalize(&input)
                .map_err(|reason| invalid(format!("bad default: {reason}")))?,
            None => kind.fallback(),
        };

        Ok(Self { key, kind, default })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The canonical encoding restored by a reset.
    pub fn default(&self) -> &Encoded {
        &self.default
    }
}

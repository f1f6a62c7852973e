use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire options module.
pub type Result<T> = std::result::Result<T, OptionErr>;

/// The options module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionErr {
    UnknownOption {
        key: String,
    },
    InvalidValue {
        key: String,
        reason: String,
    },
    InvalidSpec {
        key: String,
        reason: String,
    },
    DuplicateOption {
        key: String,
    },
    MalformedPayload(String),
}

impl OptionErr {
    /// Returns the option key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            OptionErr::UnknownOption { key }
            | OptionErr::InvalidValue { key, .. }
            | OptionErr::InvalidSpec { key, .. }
            | OptionErr::DuplicateOption { key } => Some(key),
            OptionErr::MalformedPayload(_) => None,
        }
    }
}

impl Display for OptionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionErr::UnknownOption { key } => write!(f, "unknown option '{key}'"),
            OptionErr::InvalidValue { key, reason } => {
                write!(f, "invalid value for option '{key}': {reason}")
            }
            OptionErr::InvalidSpec { key, reason } => {
                write!(f, "invalid spec for option '{key}': {reason}")
            }
            OptionErr::DuplicateOption { key } => {
                write!(f, "option '{key}' is declared more than once")
            }
            OptionErr::MalformedPayload(msg) => write!(f, "malformed options payload: {msg}"),
        }
    }
}

impl Error for OptionErr {}

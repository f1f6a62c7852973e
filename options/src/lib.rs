//! The option model of a generation model: what can be tuned, how each option is
//! canonically encoded and how snapshots are imported and exported.

mod error;
mod model;
pub mod payload;
mod registry;
mod spec;
mod value;

pub use error::{OptionErr, Result};
pub use model::OptionModel;
pub use payload::{ImportReport, PayloadEntry};
pub use registry::OptionRegistry;
pub use spec::{OptionKind, OptionSpec, RESERVED_KEY};
pub use value::{Encoded, OptionInput, OptionValue};

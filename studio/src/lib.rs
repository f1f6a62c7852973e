//! Session level glue: model descriptors, the option and noise state of the active model,
//! change notifications and the import/export flows of noise images and option payloads.

pub mod config;
mod error;
mod event;
mod payload;
mod session;
mod transfer;

pub use config::{Catalog, ModelDescriptor, OptionDraft};
pub use error::{Result, StudioErr};
pub use event::SessionEvent;
pub use payload::PayloadReport;
pub use session::{MAX_COUNT, Session};
pub use transfer::{ImportOutcome, RequestToken};

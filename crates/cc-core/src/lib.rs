//! Shared consent types: records, decisions, categories, clock and errors.

pub mod clock;
pub mod error;
pub mod record;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ConsentError;
pub use record::{
    ConsentDecision, ConsentRecord, DecisionPatch, Selections, Transition, ValidityWindow,
};
pub use types::{
    CONSENT_SCHEMA_VERSION, CONSENT_STORAGE_KEY, CONSENT_VALIDITY_DAYS, Category, OutputFormat,
    is_valid_storage_key,
};

//! Consent record load/save on top of a [`KeyValueStorage`].

use crate::storage::KeyValueStorage;
use cc_core::{CONSENT_STORAGE_KEY, ConsentDecision, ConsentError, ConsentRecord, ValidityWindow};
use chrono::{DateTime, Utc};

/// Result of reading the stored record.
///
/// Callers that only care about the fail-safe behaviour use
/// [`LoadOutcome::into_record`]; `Invalid` keeps the reason around for
/// logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Found(ConsentRecord),
    Absent,
    Invalid(ConsentError),
}

impl LoadOutcome {
    pub fn record(&self) -> Option<&ConsentRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<ConsentRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[derive(Debug)]
pub struct ConsentStore<S> {
    storage: S,
    key: String,
    window: ValidityWindow,
}

impl<S: KeyValueStorage> ConsentStore<S> {
    /// Store with the built-in key, schema version and 180-day window.
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, CONSENT_STORAGE_KEY, ValidityWindow::default())
    }

    pub fn with_settings(storage: S, key: impl Into<String>, window: ValidityWindow) -> Self {
        Self {
            storage,
            key: key.into(),
            window,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn window(&self) -> &ValidityWindow {
        &self.window
    }

    /// Read and validate the stored record.
    ///
    /// Never fails: storage errors, parse errors, version mismatches and
    /// expired records all come back as something other than `Found`.
    pub fn load(&self, now: DateTime<Utc>) -> LoadOutcome {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No stored consent record");
                return LoadOutcome::Absent;
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Error reading consent from storage: {e}");
                return LoadOutcome::Invalid(e);
            }
        };

        let record: ConsentRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(key = %self.key, "Discarding unparsable consent record: {e}");
                return LoadOutcome::Invalid(ConsentError::MalformedRecord(e.to_string()));
            }
        };

        match self.window.check(&record, now) {
            Ok(()) => LoadOutcome::Found(record),
            Err(e) => {
                tracing::info!(key = %self.key, "Stored consent no longer valid: {e}");
                LoadOutcome::Invalid(e)
            }
        }
    }

    /// Stamp `decision` with `now` and the current schema version, then
    /// overwrite the stored record.
    pub fn save(
        &mut self,
        decision: ConsentDecision,
        now: DateTime<Utc>,
    ) -> Result<ConsentRecord, ConsentError> {
        let record = ConsentRecord::new(decision, now, self.window.schema_version.clone());
        let json = serde_json::to_string(&record)
            .map_err(|e| ConsentError::storage("write", format!("serialize: {e}")))?;
        self.storage.set(&self.key, &json)?;
        tracing::debug!(
            key = %self.key,
            analytics = record.analytics,
            marketing = record.marketing,
            "Consent record saved"
        );
        Ok(record)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

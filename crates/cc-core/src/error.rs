/// Failure taxonomy of the consent subsystem.
///
/// None of these are fatal: every variant degrades to "ask again" or
/// "tracking did not start".
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("Consent storage unavailable during {op}: {reason}")]
    StorageUnavailable { op: &'static str, reason: String },

    #[error("Malformed consent record: {0}")]
    MalformedRecord(String),

    #[error("Consent record expired ({age_days} days old, limit {limit_days})")]
    Expired { age_days: i64, limit_days: u32 },

    #[error("Consent schema version mismatch: found '{found}', expected '{expected}'")]
    VersionMismatch { found: String, expected: String },
}

impl ConsentError {
    pub fn storage(op: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            op,
            reason: reason.to_string(),
        }
    }

    /// Expired and version-mismatched records are expected over a record's
    /// lifetime; everything else points at a broken store.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Expired { .. } | Self::VersionMismatch { .. })
    }
}

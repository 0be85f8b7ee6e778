//! Consent record and decision types

use crate::error::ConsentError;
use crate::types::{CONSENT_SCHEMA_VERSION, CONSENT_VALIDITY_DAYS, Category};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn always_true() -> bool {
    true
}

/// Accept any boolean for `essential` but always yield `true`.
fn deserialize_essential<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    bool::deserialize(deserializer)?;
    Ok(true)
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix
/// (`2024-05-01T09:30:00.000Z`), the shape browsers write.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// The user's choice about each cookie category.
///
/// `essential` is private and every constructor forces it to `true`, so no
/// value of this type can ever carry `essential = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentDecision {
    #[serde(default = "always_true", deserialize_with = "deserialize_essential")]
    essential: bool,
    pub analytics: bool,
    pub marketing: bool,
}

impl Default for ConsentDecision {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl ConsentDecision {
    pub const fn new(analytics: bool, marketing: bool) -> Self {
        Self {
            essential: true,
            analytics,
            marketing,
        }
    }

    pub fn essential(&self) -> bool {
        self.essential
    }

    pub fn is_granted(&self, category: Category) -> bool {
        match category {
            Category::Essential => self.essential,
            Category::Analytics => self.analytics,
            Category::Marketing => self.marketing,
        }
    }

    /// Merge a partial update. Absent fields keep their current value and
    /// any request concerning `essential` is ignored.
    pub fn merge(self, patch: &DecisionPatch) -> Self {
        Self::new(
            patch.analytics.unwrap_or(self.analytics),
            patch.marketing.unwrap_or(self.marketing),
        )
    }
}

/// Partial decision submitted by the decision surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
    /// Accepted so callers can pass it through, never honoured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essential: Option<bool>,
}

impl DecisionPatch {
    /// True when the patch asks to switch `essential` off.
    pub fn attempts_essential_revocation(&self) -> bool {
        self.essential == Some(false)
    }
}

/// Per-category toggle positions collected by the settings surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub analytics: bool,
    pub marketing: bool,
}

impl From<ConsentDecision> for Selections {
    fn from(decision: ConsentDecision) -> Self {
        Self {
            analytics: decision.analytics,
            marketing: decision.marketing,
        }
    }
}

/// The three ways a user can leave the undecided state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AcceptAll,
    RejectNonEssential,
    CustomSave(Selections),
}

impl Transition {
    pub fn patch(&self) -> DecisionPatch {
        let (analytics, marketing) = match self {
            Self::AcceptAll => (true, true),
            Self::RejectNonEssential => (false, false),
            Self::CustomSave(selections) => (selections.analytics, selections.marketing),
        };
        DecisionPatch {
            analytics: Some(analytics),
            marketing: Some(marketing),
            essential: None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcceptAll => "accept-all",
            Self::RejectNonEssential => "reject-non-essential",
            Self::CustomSave(_) => "custom-save",
        }
    }
}

/// Persisted consent record.
///
/// Serialized as
/// `{"essential":true,"analytics":..,"marketing":..,"timestamp":"..","schemaVersion":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    #[serde(default = "always_true", deserialize_with = "deserialize_essential")]
    essential: bool,
    pub analytics: bool,
    pub marketing: bool,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub schema_version: String,
}

impl ConsentRecord {
    pub fn new(
        decision: ConsentDecision,
        timestamp: DateTime<Utc>,
        schema_version: impl Into<String>,
    ) -> Self {
        Self {
            essential: true,
            analytics: decision.analytics,
            marketing: decision.marketing,
            timestamp,
            schema_version: schema_version.into(),
        }
    }

    pub fn essential(&self) -> bool {
        self.essential
    }

    pub fn decision(&self) -> ConsentDecision {
        ConsentDecision::new(self.analytics, self.marketing)
    }

    /// Time elapsed since the record was stamped. Negative when the record
    /// comes from a clock running ahead of `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
    }
}

/// Rules deciding whether a stored record still counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityWindow {
    pub schema_version: String,
    pub validity_days: u32,
}

impl Default for ValidityWindow {
    fn default() -> Self {
        Self {
            schema_version: CONSENT_SCHEMA_VERSION.to_string(),
            validity_days: CONSENT_VALIDITY_DAYS,
        }
    }
}

impl ValidityWindow {
    pub fn new(schema_version: impl Into<String>, validity_days: u32) -> Self {
        Self {
            schema_version: schema_version.into(),
            validity_days,
        }
    }

    pub fn max_age(&self) -> Duration {
        Duration::days(i64::from(self.validity_days))
    }

    /// A record is valid iff its version matches and `now - timestamp` is
    /// strictly below the window.
    pub fn check(&self, record: &ConsentRecord, now: DateTime<Utc>) -> Result<(), ConsentError> {
        if record.schema_version != self.schema_version {
            return Err(ConsentError::VersionMismatch {
                found: record.schema_version.clone(),
                expected: self.schema_version.clone(),
            });
        }
        let age = record.age(now);
        if age >= self.max_age() {
            return Err(ConsentError::Expired {
                age_days: age.num_days(),
                limit_days: self.validity_days,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

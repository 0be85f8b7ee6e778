use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Key under which the consent record is stored.
pub const CONSENT_STORAGE_KEY: &str = "cookie_consent";

/// Schema version stamped on every saved record.
///
/// Bumping this invalidates every previously stored record and forces the
/// user to decide again.
pub const CONSENT_SCHEMA_VERSION: &str = "1.0";

/// A record older than this many days is treated as absent.
pub const CONSENT_VALIDITY_DAYS: u32 = 180;

/// Whether `key` can name a stored record.
///
/// Keys map to file names, so only `[A-Za-z0-9_.-]` is allowed and a
/// leading `.` is rejected.
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Cookie usage category a user can grant or refuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Always on. Needed for basic site function and never revocable.
    Essential,
    /// Gates the measurement integration.
    Analytics,
    /// Reserved; no integration is attached yet.
    Marketing,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Essential, Self::Analytics, Self::Marketing];

    /// Returns the storage/UI-facing name for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
        }
    }

    /// Whether the user may switch this category off.
    pub fn is_optional(&self) -> bool {
        !matches!(self, Self::Essential)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "essential" => Ok(Self::Essential),
            "analytics" => Ok(Self::Analytics),
            "marketing" => Ok(Self::Marketing),
            other => Err(format!(
                "Invalid category '{other}'. Valid values: essential, analytics, marketing"
            )),
        }
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

use serde::{Deserialize, Serialize};

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 UTC";

/// How a cookie's `domain` attribute was set when it was written.
///
/// A clearing write only hits the cookie if its scoping matches, and
/// browsers offer no single call covering all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CookieScope {
    /// `domain=.example.com`
    LeadingDot,
    /// No `domain` attribute (host-only cookie).
    Unscoped,
    /// `domain=example.com`
    Bare,
}

impl CookieScope {
    /// Clearing order: leading dot, no domain, bare domain.
    pub const ALL: [CookieScope; 3] = [Self::LeadingDot, Self::Unscoped, Self::Bare];

    pub fn domain_attr(&self, hostname: &str) -> Option<String> {
        match self {
            Self::LeadingDot => Some(format!(".{hostname}")),
            Self::Unscoped => None,
            Self::Bare => Some(hostname.to_string()),
        }
    }
}

/// A `document.cookie` assignment that expires one cookie under one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDirective {
    pub name: String,
    pub scope: CookieScope,
    pub hostname: String,
}

impl CookieDirective {
    pub fn expire(name: impl Into<String>, scope: CookieScope, hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope,
            hostname: hostname.into(),
        }
    }
}

impl std::fmt::Display for CookieDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope.domain_attr(&self.hostname) {
            Some(domain) => write!(
                f,
                "{}=; expires={EPOCH_EXPIRES}; path=/; domain={domain}",
                self.name
            ),
            None => write!(f, "{}=; expires={EPOCH_EXPIRES}; path=/;", self.name),
        }
    }
}

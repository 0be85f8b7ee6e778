//! Reconciliation of the analytics integration with the consent decision.

use crate::cookie::{CookieDirective, CookieScope};
use crate::document::{GtagCommand, HostDocument, ScriptElement};
use cc_config::AnalyticsConfig;
use cc_core::ConsentDecision;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

/// Static description of the analytics vendor integration.
#[derive(Debug, Clone)]
pub struct AnalyticsIntegration {
    pub measurement_id: String,
    pub loader_url: String,
    /// Cleared whether or not the page can currently see them.
    pub cookie_names: Vec<String>,
    /// Matched against cookie names visible in the document.
    pub cookie_patterns: Vec<Regex>,
}

impl AnalyticsIntegration {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, regex::Error> {
        let cookie_patterns = config
            .cookie_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            measurement_id: config.measurement_id.clone(),
            loader_url: config.loader_url(),
            cookie_names: config.tracking_cookie_names(),
            cookie_patterns,
        })
    }

    fn loader_script(&self, now: DateTime<Utc>) -> ScriptElement {
        ScriptElement {
            src: self.loader_url.clone(),
            async_load: true,
            on_load: vec![
                GtagCommand::Js(now),
                GtagCommand::Config(self.measurement_id.clone()),
            ],
        }
    }

    /// Fixed names first, then any visible cookie matching a pattern.
    fn cookies_to_clear(&self, visible: &[String]) -> Vec<String> {
        let mut names = self.cookie_names.clone();
        for name in visible {
            if names.contains(name) {
                continue;
            }
            if self.cookie_patterns.iter().any(|re| re.is_match(name)) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// What reconciliation did to the analytics integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum AnalyticsAction {
    /// Loader appended to the document.
    Loaded { src: String },
    /// Loader was already requested this session or already present.
    AlreadyLoaded { src: String },
    /// Tracking cookies expired under every scope.
    Cleared {
        cookies: Vec<String>,
        directives: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub analytics: AnalyticsAction,
    /// Marketing has no integration; reported for visibility only.
    pub marketing_granted: bool,
}

/// Makes the live integration match a decision.
///
/// The only state kept is whether the loader was requested during this
/// session, which is what makes repeated reconciliation idempotent.
#[derive(Debug)]
pub struct IntegrationGate {
    integration: AnalyticsIntegration,
    requested: bool,
}

impl IntegrationGate {
    pub fn new(integration: AnalyticsIntegration) -> Self {
        Self {
            integration,
            requested: false,
        }
    }

    pub fn integration(&self) -> &AnalyticsIntegration {
        &self.integration
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn reconcile<D: HostDocument + ?Sized>(
        &mut self,
        document: &mut D,
        decision: &ConsentDecision,
        now: DateTime<Utc>,
    ) -> ReconcileReport {
        let analytics = if decision.analytics {
            self.ensure_loaded(document, now)
        } else {
            self.clear_cookies(document)
        };
        ReconcileReport {
            analytics,
            marketing_granted: decision.marketing,
        }
    }

    fn ensure_loaded<D: HostDocument + ?Sized>(
        &mut self,
        document: &mut D,
        now: DateTime<Utc>,
    ) -> AnalyticsAction {
        let src = self.integration.loader_url.clone();
        if self.requested || document.has_script(&src) {
            self.requested = true;
            tracing::debug!(%src, "Analytics loader already requested");
            return AnalyticsAction::AlreadyLoaded { src };
        }
        document.append_script(self.integration.loader_script(now));
        self.requested = true;
        tracing::info!(%src, "Analytics loader injected");
        AnalyticsAction::Loaded { src }
    }

    fn clear_cookies<D: HostDocument + ?Sized>(&self, document: &mut D) -> AnalyticsAction {
        let hostname = document.hostname().to_string();
        let cookies = self.integration.cookies_to_clear(&document.cookie_names());
        let mut directives = 0;
        for name in &cookies {
            for scope in CookieScope::ALL {
                document.write_cookie(&CookieDirective::expire(name.as_str(), scope, &hostname));
                directives += 1;
            }
        }
        tracing::info!(
            host = %hostname,
            count = cookies.len(),
            "Analytics cookies cleared"
        );
        AnalyticsAction::Cleared {
            cookies,
            directives,
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;

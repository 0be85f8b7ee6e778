//! In-memory consent state

use cc_core::{ConsentDecision, ConsentRecord, DecisionPatch};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether the user has made a (still valid) decision on this profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentPhase {
    #[default]
    Undecided,
    Decided,
}

impl std::fmt::Display for ConsentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undecided => write!(f, "undecided"),
            Self::Decided => write!(f, "decided"),
        }
    }
}

/// Current consent decision.
///
/// Starts at the safe defaults (only essential granted). Only the owning
/// [`ConsentManager`](crate::ConsentManager) can replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsentState {
    decision: ConsentDecision,
    phase: ConsentPhase,
    /// Timestamp of the record backing this state, when it was persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    recorded_at: Option<DateTime<Utc>>,
}

impl ConsentState {
    pub fn decision(&self) -> ConsentDecision {
        self.decision
    }

    pub fn phase(&self) -> ConsentPhase {
        self.phase
    }

    pub fn is_decided(&self) -> bool {
        self.phase == ConsentPhase::Decided
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }

    /// Decision that would result from applying `patch`. Pure.
    pub fn decide(&self, patch: &DecisionPatch) -> ConsentDecision {
        if patch.attempts_essential_revocation() {
            tracing::debug!("Ignoring request to disable essential cookies");
        }
        self.decision.merge(patch)
    }

    /// Take over a stored record verbatim.
    pub(crate) fn adopt(&mut self, record: &ConsentRecord) {
        self.decision = record.decision();
        self.phase = ConsentPhase::Decided;
        self.recorded_at = Some(record.timestamp);
    }

    pub(crate) fn replace(&mut self, decision: ConsentDecision, recorded_at: Option<DateTime<Utc>>) {
        self.decision = decision;
        self.phase = ConsentPhase::Decided;
        self.recorded_at = recorded_at;
    }
}

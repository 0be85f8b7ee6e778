//! Consent manager: the single write path for consent decisions.
//!
//! Every decision flows `decide` (pure) -> `commit` (persist, then
//! reconcile). Storage failures never stop the flow; the decision then lives
//! in memory for this session only and the user is asked again next visit.

use crate::state::ConsentState;
use cc_config::ConsentConfig;
use cc_core::{
    Clock, ConsentDecision, ConsentError, ConsentRecord, DecisionPatch, Selections, SystemClock,
    Transition,
};
use cc_gate::{AnalyticsIntegration, HostDocument, IntegrationGate, ReconcileReport};
use cc_store::{ConsentStore, KeyValueStorage, LoadOutcome};

/// What `initialize` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupOutcome {
    /// The decision surface must ask the user.
    pub decision_required: bool,
    /// Decision adopted from storage, if a valid record existed.
    pub adopted: Option<ConsentDecision>,
    /// Why a stored record was discarded (expired, malformed, ...).
    pub discarded: Option<ConsentError>,
    /// Gate reconciliation performed for an adopted record.
    pub reconcile: Option<ReconcileReport>,
}

/// Result of one committed decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDecision {
    pub decision: ConsentDecision,
    /// The record written, or why it could not be written.
    pub persisted: Result<ConsentRecord, ConsentError>,
    pub reconcile: ReconcileReport,
}

impl AppliedDecision {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

#[derive(Debug)]
pub struct ConsentManager<S, D, C = SystemClock> {
    store: ConsentStore<S>,
    gate: IntegrationGate,
    document: D,
    clock: C,
    state: ConsentState,
    startup: Option<StartupOutcome>,
}

impl<S: KeyValueStorage, D: HostDocument> ConsentManager<S, D, SystemClock> {
    /// Build a manager from configuration using the wall clock.
    pub fn from_config(
        config: &ConsentConfig,
        storage: S,
        document: D,
    ) -> Result<Self, regex::Error> {
        Self::from_config_with_clock(config, storage, document, SystemClock)
    }
}

impl<S: KeyValueStorage, D: HostDocument, C: Clock> ConsentManager<S, D, C> {
    pub fn new(store: ConsentStore<S>, gate: IntegrationGate, document: D, clock: C) -> Self {
        Self {
            store,
            gate,
            document,
            clock,
            state: ConsentState::default(),
            startup: None,
        }
    }

    pub fn from_config_with_clock(
        config: &ConsentConfig,
        storage: S,
        document: D,
        clock: C,
    ) -> Result<Self, regex::Error> {
        let store = ConsentStore::with_settings(
            storage,
            config.storage.key.clone(),
            config.storage.validity_window(),
        );
        let gate = IntegrationGate::new(AnalyticsIntegration::from_config(&config.analytics)?);
        Ok(Self::new(store, gate, document, clock))
    }

    /// Read the store and adopt a valid record, reconciling the gate as if
    /// the decision had just been made. Idempotent: later calls return the
    /// first outcome without touching storage or the document.
    pub fn initialize(&mut self) -> StartupOutcome {
        if let Some(outcome) = &self.startup {
            return outcome.clone();
        }

        let now = self.clock.now();
        let outcome = match self.store.load(now) {
            LoadOutcome::Found(record) => {
                self.state.adopt(&record);
                let decision = self.state.decision();
                tracing::debug!(
                    analytics = decision.analytics,
                    marketing = decision.marketing,
                    "Adopted stored consent"
                );
                let report = self.gate.reconcile(&mut self.document, &decision, now);
                StartupOutcome {
                    decision_required: false,
                    adopted: Some(decision),
                    discarded: None,
                    reconcile: Some(report),
                }
            }
            LoadOutcome::Absent => StartupOutcome {
                decision_required: true,
                adopted: None,
                discarded: None,
                reconcile: None,
            },
            LoadOutcome::Invalid(reason) => StartupOutcome {
                decision_required: true,
                adopted: None,
                discarded: Some(reason),
                reconcile: None,
            },
        };

        self.startup = Some(outcome.clone());
        outcome
    }

    pub fn is_initialized(&self) -> bool {
        self.startup.is_some()
    }

    /// Read-only snapshot of the current decision.
    pub fn current_decision(&self) -> ConsentDecision {
        self.state.decision()
    }

    pub fn state(&self) -> &ConsentState {
        &self.state
    }

    /// Toggle positions for a reopened settings surface: the current
    /// decision once decided, all-off before that.
    pub fn selections(&self) -> Selections {
        if self.state.is_decided() {
            Selections::from(self.state.decision())
        } else {
            Selections::default()
        }
    }

    /// Pure decision step: what `patch` would turn the state into.
    pub fn decide(&self, patch: &DecisionPatch) -> ConsentDecision {
        self.state.decide(patch)
    }

    /// Effect step: persist `decision`, adopt it, then reconcile the gate.
    pub fn commit(&mut self, decision: ConsentDecision) -> AppliedDecision {
        let now = self.clock.now();
        let persisted = self.store.save(decision, now);
        match &persisted {
            Ok(record) => self.state.replace(decision, Some(record.timestamp)),
            Err(e) => {
                tracing::warn!("Error saving consent to storage: {e}");
                self.state.replace(decision, None);
            }
        }
        let reconcile = self.gate.reconcile(&mut self.document, &decision, now);
        AppliedDecision {
            decision,
            persisted,
            reconcile,
        }
    }

    /// Merge `patch` into the current decision and commit it.
    pub fn apply_decision(&mut self, patch: &DecisionPatch) -> AppliedDecision {
        let decision = self.decide(patch);
        self.commit(decision)
    }

    pub fn apply_transition(&mut self, transition: Transition) -> AppliedDecision {
        tracing::debug!(transition = transition.as_str(), "Applying consent transition");
        self.apply_decision(&transition.patch())
    }

    pub fn accept_all(&mut self) -> AppliedDecision {
        self.apply_transition(Transition::AcceptAll)
    }

    pub fn reject_non_essential(&mut self) -> AppliedDecision {
        self.apply_transition(Transition::RejectNonEssential)
    }

    pub fn custom_save(&mut self, selections: Selections) -> AppliedDecision {
        self.apply_transition(Transition::CustomSave(selections))
    }

    pub fn store(&self) -> &ConsentStore<S> {
        &self.store
    }

    pub fn gate(&self) -> &IntegrationGate {
        &self.gate
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;

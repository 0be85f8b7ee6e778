//! Decision surface transition logic (banner + settings modal).
//!
//! Markup and styling belong to the host; this module only tracks what is
//! shown, the toggle positions, and which user action maps to which
//! consent transition.

use crate::manager::{AppliedDecision, ConsentManager, StartupOutcome};
use cc_core::{Category, Clock, ConsentDecision, Selections, Transition};
use cc_gate::HostDocument;
use cc_store::KeyValueStorage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerState {
    Visible,
    Hidden,
}

/// Settings modal. Exists from startup on; `open` tracks visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsModal {
    pub open: bool,
    pub toggles: Selections,
}

/// User input the surface understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Banner "accept all".
    AcceptAll,
    /// Banner "reject non-essential".
    RejectNonEssential,
    /// Banner "configure" or the page-level cookie settings link.
    OpenSettings,
    CloseSettings,
    Toggle(Category),
    /// Modal "save preferences".
    SaveSettings,
    /// Modal "reject non-essential".
    RejectFromSettings,
    /// Raw keydown, by `KeyboardEvent.key` name.
    KeyDown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEffect {
    /// Action did not apply in the current surface state.
    Ignored,
    /// Only surface state changed.
    Updated,
    Decided(AppliedDecision),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionSurface {
    banner: BannerState,
    modal: SettingsModal,
}

impl DecisionSurface {
    /// Surface as set up at startup: the banner shows only when a decision
    /// is required, the settings modal is always created (closed), with
    /// toggles taken from any adopted decision.
    pub fn mount(startup: &StartupOutcome) -> Self {
        let banner = if startup.decision_required {
            BannerState::Visible
        } else {
            BannerState::Hidden
        };
        let toggles = startup.adopted.map(Selections::from).unwrap_or_default();
        Self {
            banner,
            modal: SettingsModal {
                open: false,
                toggles,
            },
        }
    }

    pub fn banner(&self) -> BannerState {
        self.banner
    }

    pub fn banner_visible(&self) -> bool {
        self.banner == BannerState::Visible
    }

    pub fn modal(&self) -> &SettingsModal {
        &self.modal
    }

    pub fn modal_open(&self) -> bool {
        self.modal.open
    }

    pub fn toggles(&self) -> Selections {
        self.modal.toggles
    }

    pub fn handle<S, D, C>(
        &mut self,
        action: SurfaceAction,
        manager: &mut ConsentManager<S, D, C>,
    ) -> SurfaceEffect
    where
        S: KeyValueStorage,
        D: HostDocument,
        C: Clock,
    {
        match action {
            SurfaceAction::AcceptAll if self.banner_visible() => {
                self.decide(Transition::AcceptAll, manager)
            }
            SurfaceAction::RejectNonEssential if self.banner_visible() => {
                self.decide(Transition::RejectNonEssential, manager)
            }
            SurfaceAction::AcceptAll | SurfaceAction::RejectNonEssential => SurfaceEffect::Ignored,
            SurfaceAction::OpenSettings => {
                if manager.state().is_decided() {
                    self.modal.toggles = manager.selections();
                }
                self.modal.open = true;
                SurfaceEffect::Updated
            }
            SurfaceAction::CloseSettings => self.close(),
            SurfaceAction::KeyDown(key) if key == "Escape" => self.close(),
            SurfaceAction::KeyDown(_) => SurfaceEffect::Ignored,
            SurfaceAction::Toggle(category) => self.toggle(category),
            SurfaceAction::SaveSettings if self.modal.open => {
                self.decide(Transition::CustomSave(self.modal.toggles), manager)
            }
            SurfaceAction::RejectFromSettings if self.modal.open => {
                self.decide(Transition::RejectNonEssential, manager)
            }
            SurfaceAction::SaveSettings | SurfaceAction::RejectFromSettings => {
                SurfaceEffect::Ignored
            }
        }
    }

    fn decide<S, D, C>(
        &mut self,
        transition: Transition,
        manager: &mut ConsentManager<S, D, C>,
    ) -> SurfaceEffect
    where
        S: KeyValueStorage,
        D: HostDocument,
        C: Clock,
    {
        let applied = manager.apply_transition(transition);
        self.settle(applied.decision);
        SurfaceEffect::Decided(applied)
    }

    /// Any decision hides the banner and closes the modal.
    fn settle(&mut self, decision: ConsentDecision) {
        self.banner = BannerState::Hidden;
        self.modal.open = false;
        self.modal.toggles = Selections::from(decision);
    }

    fn close(&mut self) -> SurfaceEffect {
        if !self.modal.open {
            return SurfaceEffect::Ignored;
        }
        self.modal.open = false;
        SurfaceEffect::Updated
    }

    fn toggle(&mut self, category: Category) -> SurfaceEffect {
        if !self.modal.open {
            return SurfaceEffect::Ignored;
        }
        match category {
            Category::Essential => SurfaceEffect::Ignored,
            Category::Analytics => {
                self.modal.toggles.analytics = !self.modal.toggles.analytics;
                SurfaceEffect::Updated
            }
            Category::Marketing => {
                self.modal.toggles.marketing = !self.modal.toggles.marketing;
                SurfaceEffect::Updated
            }
        }
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;

//! Consent state manager: owns the in-memory decision and drives
//! store persistence and gate reconciliation from user decisions.

pub mod manager;
pub mod state;
pub mod surface;

pub use manager::{AppliedDecision, ConsentManager, StartupOutcome};
pub use state::{ConsentPhase, ConsentState};
pub use surface::{BannerState, DecisionSurface, SettingsModal, SurfaceAction, SurfaceEffect};

//! Integration gate: loads or tears down the analytics integration so the
//! host document matches the current consent decision.

pub mod cookie;
pub mod document;
pub mod gate;

pub use cookie::{CookieDirective, CookieScope};
pub use document::{GtagCommand, HostDocument, MemoryDocument, ScriptElement};
pub use gate::{AnalyticsAction, AnalyticsIntegration, IntegrationGate, ReconcileReport};

use anyhow::{Context, Result};
use cc_config::ConsentConfig;
use cc_core::{Category, ConsentDecision, OutputFormat, Transition};
use cc_gate::{AnalyticsAction, MemoryDocument, ReconcileReport};
use cc_manager::{AppliedDecision, ConsentManager, DecisionSurface, SurfaceAction};
use cc_store::FileStorage;
use std::path::PathBuf;

type CliManager = ConsentManager<FileStorage, MemoryDocument>;

/// Everything a consent command needs, resolved from flags and config.
pub(crate) struct ConsentContext {
    pub config: ConsentConfig,
    pub profile_dir: PathBuf,
    pub host: String,
}

impl ConsentContext {
    fn open_manager(&self) -> Result<CliManager> {
        let storage = FileStorage::new(&self.profile_dir);
        let document = MemoryDocument::new(self.host.clone());
        ConsentManager::from_config(&self.config, storage, document)
            .context("Invalid analytics.cookie_patterns in consent config")
    }
}

fn on_off(granted: bool) -> &'static str {
    if granted { "granted" } else { "denied" }
}

fn print_decision(decision: &ConsentDecision) {
    for category in Category::ALL {
        println!("{:<10} {}", category.as_str(), on_off(decision.is_granted(category)));
    }
}

fn print_reconcile(report: &ReconcileReport) {
    match &report.analytics {
        AnalyticsAction::Loaded { src } => println!("gate: analytics loader injected ({src})"),
        AnalyticsAction::AlreadyLoaded { src } => {
            println!("gate: analytics loader already present ({src})")
        }
        AnalyticsAction::Cleared {
            cookies,
            directives,
        } => println!(
            "gate: cleared {} tracking cookie(s) with {directives} directive(s): {}",
            cookies.len(),
            cookies.join(", ")
        ),
    }
    println!("gate: marketing {} (no integration)", on_off(report.marketing_granted));
}

pub(crate) fn handle_status(ctx: &ConsentContext, format: OutputFormat) -> Result<()> {
    let mut manager = ctx.open_manager()?;
    let startup = manager.initialize();
    let state = manager.state();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "profile_dir": ctx.profile_dir,
                "phase": state.phase(),
                "decision": state.decision(),
                "recorded_at": state.recorded_at(),
                "decision_required": startup.decision_required,
                "discarded": startup.discarded.as_ref().map(|e| e.to_string()),
                "reconcile": startup.reconcile,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("profile: {}", ctx.profile_dir.display());
            println!("phase: {}", state.phase());
            if let Some(ts) = state.recorded_at() {
                println!("recorded: {}", ts.to_rfc3339());
            }
            if let Some(reason) = &startup.discarded {
                println!("discarded: {reason}");
            }
            print_decision(&state.decision());
            if startup.decision_required {
                println!("banner: shown (decision required)");
            }
            if let Some(report) = &startup.reconcile {
                print_reconcile(report);
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_decision(
    ctx: &ConsentContext,
    transition: Transition,
    format: OutputFormat,
) -> Result<()> {
    let mut manager = ctx.open_manager()?;
    manager.initialize();
    let applied = manager.apply_transition(transition);
    print_applied(transition, &applied, format)
}

fn print_applied(
    transition: Transition,
    applied: &AppliedDecision,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let (record, error) = match &applied.persisted {
                Ok(record) => (Some(record), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let value = serde_json::json!({
                "transition": transition.as_str(),
                "decision": applied.decision,
                "record": record,
                "persist_error": error,
                "reconcile": applied.reconcile,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("applied: {}", transition.as_str());
            print_decision(&applied.decision);
            match &applied.persisted {
                Ok(record) => println!("saved: {}", record.timestamp.to_rfc3339()),
                Err(e) => {
                    tracing::warn!("Decision kept for this run only: {e}");
                    println!("saved: no (will be asked again next visit)");
                }
            }
            print_reconcile(&applied.reconcile);
        }
    }
    Ok(())
}

pub(crate) fn handle_settings(ctx: &ConsentContext, format: OutputFormat) -> Result<()> {
    let mut manager = ctx.open_manager()?;
    let startup = manager.initialize();
    let mut surface = DecisionSurface::mount(&startup);
    surface.handle(SurfaceAction::OpenSettings, &mut manager);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&surface)?);
        }
        OutputFormat::Text => {
            let toggles = surface.toggles();
            println!("{:<10} on (always)", Category::Essential.as_str());
            println!(
                "{:<10} {}",
                Category::Analytics.as_str(),
                if toggles.analytics { "on" } else { "off" }
            );
            println!(
                "{:<10} {}",
                Category::Marketing.as_str(),
                if toggles.marketing { "on" } else { "off" }
            );
        }
    }
    Ok(())
}

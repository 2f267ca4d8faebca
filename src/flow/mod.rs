//! Multi-step dialog flow orchestration
//!
//! This module is the decision core of the admin console: it chains the
//! dialog surfaces (confirmation, alert, progress, selection, settings)
//! into named workflows and decides, per `(flow, step)` and incoming
//! event, which dialog opens next and what data it carries.
//!
//! The orchestrator is deliberately independent of rendering: it emits
//! typed [`DialogCommand`]s and [`FlowOutcome`]s over channels and is
//! driven entirely by the host loop, which makes the whole state machine
//! testable without a terminal.

pub mod command;
pub mod orchestrator;
pub mod outcome;
pub mod runner;
pub mod state;
pub mod tutorial;

pub use command::{
    AlertRequest, ConfirmRequest, DialogCommand, ProgressRequest, SelectionRequest,
    SettingsRequest, SurfaceKind, Tone,
};
pub use orchestrator::FlowOrchestrator;
pub use outcome::FlowOutcome;
pub use runner::{ImmediateRunner, OperationEvent, OperationPlan, OperationRunner, TimerRunner};
pub use state::{FlowId, SelectableItem};

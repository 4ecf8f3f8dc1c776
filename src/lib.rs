// Duty Roster Library - Staff Workflow Core
// This exposes the core components for the chat-platform host and the tests

pub mod config;
pub mod ledger;
pub mod notify;
pub mod roster;
pub mod shift;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, DutyRosterConfig};
pub use ledger::{
    InMemoryLedger, LedgerError, LedgerOp, LedgerOpKind, LedgerOps, RetryPolicy, RetryingLedger,
    RowId, StaffColumns,
};
pub use notify::{human_minutes, Notifier, NotifyError, RenderHandle, ShiftView};
pub use roster::{
    FireOutcome, HirePlacement, RosterError, RosterManager, TerminationKind, WarnOutcome,
};
pub use shift::{
    ActorId, ApprovalGate, Decision, Shift, ShiftError, ShiftRegistry, ShiftStatus, ShiftWorkflow,
};
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};

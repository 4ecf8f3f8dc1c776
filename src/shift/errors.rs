use thiserror::Error;

use crate::ledger::LedgerError;
use crate::notify::NotifyError;
use crate::shift::types::ActorId;

/// Errors surfaced by shift operations.
///
/// The first three are recovered locally: the caller is told and no state
/// changes. `ActorNotFound` and ledger failures leave the awaiting shift
/// intact so a corrected retry is possible.
#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("actor {0} already has an active shift")]
    AlreadyActive(ActorId),

    #[error("actor {0} has no active shift")]
    NoActiveShift(ActorId),

    #[error("actor {0} has no shift awaiting approval")]
    NoAwaitingShift(ActorId),

    #[error("no ledger row matches display name '{display_name}'")]
    ActorNotFound { display_name: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

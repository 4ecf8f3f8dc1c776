// Staff roster management - hiring, disciplinary warnings, terminations.
//
// Everything here is a read-modify-write against the staff worksheet, plus
// one append to the employment-records worksheet when someone is fired.

pub mod fire;
pub mod hire;
pub mod warn;

use thiserror::Error;

use crate::config::RosterConfig;
use crate::ledger::{LedgerError, LedgerOps, StaffColumns};
use crate::notify::Notifier;

pub use fire::{FireOutcome, TerminationKind};
pub use hire::HirePlacement;
pub use warn::{next_disciplinary_step, WarnOutcome};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("no staff row matches '{name}'")]
    MemberNotFound { name: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Staff-management operations over the roster ledgers.
pub struct RosterManager<L, N> {
    staff: L,
    employment: L,
    notifier: N,
    columns: StaffColumns,
    entry_rank: String,
    employment_first_column: u32,
    warning_dm_template: String,
}

impl<L: LedgerOps, N: Notifier> RosterManager<L, N> {
    pub fn new(
        staff: L,
        employment: L,
        notifier: N,
        columns: StaffColumns,
        roster: &RosterConfig,
        employment_first_column: u32,
    ) -> Self {
        Self {
            staff,
            employment,
            notifier,
            columns,
            entry_rank: roster.entry_rank.clone(),
            employment_first_column,
            warning_dm_template: roster.warning_dm_template.clone(),
        }
    }
}

// Termination - record the departure on the employment sheet, then drop
// the staff row.
//
// The two writes are not transactional across worksheets: a failure after
// the employment append leaves both sides inspectable and the error
// surfaces to the caller.

use tracing::info;

use crate::ledger::{LedgerOps, RowId};
use crate::notify::Notifier;
use crate::roster::{RosterError, RosterManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationKind {
    Honourable,
    Dishonourable,
    Blacklist,
    NotApplicable,
}

impl std::fmt::Display for TerminationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TerminationKind::Honourable => "Honourable",
            TerminationKind::Dishonourable => "Dishonourable",
            TerminationKind::Blacklist => "Blacklist",
            TerminationKind::NotApplicable => "N/A",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireOutcome {
    /// Canonical username as it appeared on the staff sheet.
    pub username: String,
    pub rank: String,
    /// Row the termination record landed on.
    pub record_row: RowId,
}

impl<L: LedgerOps, N: Notifier> RosterManager<L, N> {
    /// Fire a staff member: append a termination record to the employment
    /// worksheet and remove their staff row.
    pub async fn fire(
        &self,
        username: &str,
        reason: &str,
        kind: TerminationKind,
        approved_by: &str,
    ) -> Result<FireOutcome, RosterError> {
        let row = self
            .staff
            .find_row_by_name(self.columns.username, username)
            .await?
            .ok_or_else(|| RosterError::MemberNotFound {
                name: username.to_string(),
            })?;

        let rank = self
            .staff
            .read_field(row, self.columns.rank)
            .await?
            .unwrap_or_default();
        let canonical = self
            .staff
            .read_field(row, self.columns.username)
            .await?
            .unwrap_or_else(|| username.to_string());

        let record_row = self
            .employment
            .append_row(&self.build_employment_row(&rank, &canonical, reason, kind, approved_by))
            .await?;

        self.staff.delete_row(row).await?;

        info!(
            username = %canonical,
            rank = %rank,
            kind = %kind,
            record_row,
            "staff member fired"
        );
        Ok(FireOutcome {
            username: canonical,
            rank,
            record_row,
        })
    }

    fn build_employment_row(
        &self,
        rank: &str,
        username: &str,
        reason: &str,
        kind: TerminationKind,
        approved_by: &str,
    ) -> Vec<String> {
        let first = self.employment_first_column as usize;
        let mut row = vec![String::new(); first + 4];
        row[first - 1] = rank.to_string();
        row[first] = username.to_string();
        row[first + 1] = reason.to_string();
        row[first + 2] = kind.to_string();
        row[first + 3] = approved_by.to_string();
        row
    }
}

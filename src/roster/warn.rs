// Disciplinary warnings - escalate the ladder and tell the member why.

use tracing::{info, warn};

use crate::ledger::LedgerOps;
use crate::notify::Notifier;
use crate::roster::{RosterError, RosterManager};
use crate::shift::ActorId;

/// Next rung of the disciplinary ladder.
///
/// `Suspension` is sticky; anything unrecognized restarts the ladder.
pub fn next_disciplinary_step(current: &str) -> &'static str {
    let current = current.trim().to_lowercase();
    if current.is_empty() || current == "none" {
        return "Written Warning x1";
    }
    if current.contains("written warning x1") {
        return "Written Warning x2";
    }
    if current.contains("written warning x2") {
        return "Written Warning x3";
    }
    if current.contains("written warning x3") {
        return "Suspension";
    }
    if current.contains("suspension") {
        return "Suspension";
    }
    "Written Warning x1"
}

/// Result of a warning: the disciplinary status now on the sheet and
/// whether the member actually received the DM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarnOutcome {
    pub new_status: String,
    pub dm_delivered: bool,
}

impl<L: LedgerOps, N: Notifier> RosterManager<L, N> {
    /// Warn a staff member: DM them the reason (best-effort), then move
    /// their disciplinary status one step up the ladder.
    pub async fn warn(
        &self,
        actor: ActorId,
        display_name: &str,
        reason: &str,
    ) -> Result<WarnOutcome, RosterError> {
        let message = self.warning_dm_template.replace("{reason}", reason);
        let dm_delivered = match self.notifier.dm(actor, &message).await {
            Ok(()) => true,
            Err(err) => {
                warn!(actor = %actor, error = %err, "warning DM failed");
                false
            }
        };

        let row = self
            .staff
            .find_row_by_name(self.columns.username, display_name)
            .await?
            .ok_or_else(|| RosterError::MemberNotFound {
                name: display_name.to_string(),
            })?;

        let current = self
            .staff
            .read_field(row, self.columns.disciplinary)
            .await?
            .unwrap_or_default();
        let next = next_disciplinary_step(&current);
        self.staff
            .write_field(row, self.columns.disciplinary, next)
            .await?;

        info!(
            actor = %actor,
            display_name,
            from = %current,
            to = next,
            dm_delivered,
            "staff member warned"
        );
        Ok(WarnOutcome {
            new_status: next.to_string(),
            dm_delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_escalates_in_order() {
        assert_eq!(next_disciplinary_step(""), "Written Warning x1");
        assert_eq!(next_disciplinary_step("None"), "Written Warning x1");
        assert_eq!(next_disciplinary_step(" none "), "Written Warning x1");
        assert_eq!(
            next_disciplinary_step("Written Warning x1"),
            "Written Warning x2"
        );
        assert_eq!(
            next_disciplinary_step("Written Warning x2"),
            "Written Warning x3"
        );
        assert_eq!(next_disciplinary_step("Written Warning x3"), "Suspension");
    }

    #[test]
    fn suspension_is_sticky() {
        assert_eq!(next_disciplinary_step("Suspension"), "Suspension");
    }

    #[test]
    fn unrecognized_values_restart_the_ladder() {
        assert_eq!(next_disciplinary_step("probation"), "Written Warning x1");
    }
}

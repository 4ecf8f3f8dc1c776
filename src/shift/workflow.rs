// Shift workflow - transitions between caller actions, registry state,
// ledger writes, and rendered views.
//
// Approval is the only path that touches the ledger: the accumulated-minutes
// write is the commit point, and the shift leaves the awaiting set only
// after it succeeds. A failed write leaves the shift intact and
// re-approvable.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use crate::ledger::{LedgerOps, StaffColumns};
use crate::notify::{Notifier, ShiftView};
use crate::shift::errors::ShiftError;
use crate::shift::gate::ApprovalGate;
use crate::shift::registry::ShiftRegistry;
use crate::shift::types::{ActorId, Shift};
use crate::telemetry::{create_workflow_span, generate_correlation_id};

/// Outcome of an approve or deny action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Minutes were written to the ledger and the shift was removed.
    Committed {
        actor: ActorId,
        minutes: u32,
        total_minutes: u64,
    },
    /// The shift was removed without touching the ledger.
    Discarded { actor: ActorId, minutes: u32 },
    /// Another approver got there first; nothing happened.
    AlreadyDeciding,
}

pub struct ShiftWorkflow<L, N> {
    registry: Arc<ShiftRegistry>,
    gate: ApprovalGate,
    ledger: L,
    notifier: N,
    columns: StaffColumns,
}

impl<L: LedgerOps, N: Notifier> ShiftWorkflow<L, N> {
    pub fn new(registry: Arc<ShiftRegistry>, ledger: L, notifier: N, columns: StaffColumns) -> Self {
        Self {
            registry,
            gate: ApprovalGate::new(),
            ledger,
            notifier,
            columns,
        }
    }

    pub fn registry(&self) -> &Arc<ShiftRegistry> {
        &self.registry
    }

    /// Open a shift and render its running view. The view is the caller's
    /// receipt, so a render failure rolls the registry entry back.
    pub async fn on_start(
        &self,
        actor: ActorId,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Shift, ShiftError> {
        self.registry.start(actor, display_name, now).await?;

        let view = ShiftView::Running {
            display_name: display_name.to_string(),
            started: now,
        };
        let handle = match self.notifier.render(view).await {
            Ok(handle) => handle,
            Err(err) => {
                let _ = self.registry.cancel(actor).await;
                return Err(err.into());
            }
        };

        let shift = self.registry.attach_handle(actor, handle).await?;
        info!(actor = %actor, display_name, "shift started");
        Ok(shift)
    }

    /// Close the actor's active shift and show the summary awaiting a
    /// management decision. View delivery is best-effort once the registry
    /// has moved the shift.
    pub async fn on_end(&self, actor: ActorId, now: DateTime<Utc>) -> Result<Shift, ShiftError> {
        let mut shift = self.registry.end(actor, now).await?;

        let view = summary_view(&shift);
        match shift.render_handle {
            Some(handle) => {
                if let Err(err) = self.notifier.update(handle, view).await {
                    warn!(actor = %actor, error = %err, "failed to update shift view");
                }
            }
            None => match self.notifier.render(view).await {
                Ok(handle) => {
                    if let Ok(updated) = self.registry.attach_handle(actor, handle).await {
                        shift = updated;
                    }
                }
                Err(err) => {
                    warn!(actor = %actor, error = %err, "failed to render shift summary");
                }
            },
        }

        info!(
            actor = %actor,
            minutes = shift.duration_minutes,
            "shift ended, awaiting approval"
        );
        Ok(shift)
    }

    /// Discard the actor's active shift and take its view down.
    pub async fn on_cancel(&self, actor: ActorId) -> Result<Shift, ShiftError> {
        let shift = self.registry.cancel(actor).await?;

        if let Some(handle) = shift.render_handle {
            if let Err(err) = self.notifier.remove(handle).await {
                warn!(actor = %actor, error = %err, "failed to remove canceled shift view");
            }
        }

        info!(actor = %actor, "shift canceled");
        Ok(shift)
    }

    /// Commit the awaiting shift's minutes to the ledger, then remove the
    /// shift and its view. Exactly one concurrent approve/deny proceeds;
    /// the rest observe `AlreadyDeciding`.
    pub async fn on_approve(
        &self,
        actor: ActorId,
        approver: ActorId,
    ) -> Result<Decision, ShiftError> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("approve_shift", actor.0, Some(approver.0), &correlation_id);

        async move {
            if !self.gate.try_acquire(actor).await {
                debug!(actor = %actor, "decision already in progress");
                return Ok(Decision::AlreadyDeciding);
            }

            let outcome = self.commit_approval(actor).await;
            self.gate.release(actor).await;

            match &outcome {
                Ok(Decision::Committed {
                    minutes,
                    total_minutes,
                    ..
                }) => {
                    info!(
                        actor = %actor,
                        approver = %approver,
                        minutes,
                        total_minutes,
                        "shift approved and logged"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        actor = %actor,
                        approver = %approver,
                        error = %err,
                        "approval failed, shift left awaiting"
                    );
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn commit_approval(&self, actor: ActorId) -> Result<Decision, ShiftError> {
        let shift = self
            .registry
            .get_awaiting(actor)
            .await
            .ok_or(ShiftError::NoAwaitingShift(actor))?;

        let row = self
            .ledger
            .find_row_by_name(self.columns.username, &shift.display_name)
            .await?
            .ok_or_else(|| ShiftError::ActorNotFound {
                display_name: shift.display_name.clone(),
            })?;

        let existing = self
            .ledger
            .read_field(row, self.columns.minutes)
            .await?
            .map(|value| parse_accumulated_minutes(&value))
            .unwrap_or(0);
        let total = existing + u64::from(shift.duration_minutes);

        self.ledger
            .write_field(row, self.columns.minutes, &total.to_string())
            .await?;

        // ledger write committed; the shift leaves the awaiting set only now
        let resolved = self.registry.resolve(actor).await?;

        if let Some(handle) = resolved.render_handle {
            if let Err(err) = self.notifier.remove(handle).await {
                warn!(actor = %actor, error = %err, "failed to remove approved shift view");
            }
        }

        Ok(Decision::Committed {
            actor,
            minutes: resolved.duration_minutes,
            total_minutes: total,
        })
    }

    /// Discard the awaiting shift without writing anything anywhere.
    pub async fn on_deny(&self, actor: ActorId, approver: ActorId) -> Result<Decision, ShiftError> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("deny_shift", actor.0, Some(approver.0), &correlation_id);

        async move {
            if !self.gate.try_acquire(actor).await {
                debug!(actor = %actor, "decision already in progress");
                return Ok(Decision::AlreadyDeciding);
            }

            let outcome = self.registry.resolve(actor).await;
            self.gate.release(actor).await;
            let shift = outcome?;

            if let Some(handle) = shift.render_handle {
                if let Err(err) = self.notifier.remove(handle).await {
                    warn!(actor = %actor, error = %err, "failed to remove denied shift view");
                }
            }

            info!(
                actor = %actor,
                approver = %approver,
                minutes = shift.duration_minutes,
                "shift denied, minutes discarded"
            );
            Ok(Decision::Discarded {
                actor,
                minutes: shift.duration_minutes,
            })
        }
        .instrument(span)
        .await
    }
}

fn summary_view(shift: &Shift) -> ShiftView {
    ShiftView::Summary {
        display_name: shift.display_name.clone(),
        started: shift.start_time,
        ended: shift.end_time.unwrap_or(shift.start_time),
        minutes: shift.duration_minutes,
        status: shift.status,
    }
}

/// The accumulated-minutes cell as a number; anything non-numeric or
/// missing counts as zero, matching how the sheet has always been read.
fn parse_accumulated_minutes(value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_minutes_count_as_zero() {
        assert_eq!(parse_accumulated_minutes("480"), 480);
        assert_eq!(parse_accumulated_minutes("  90 "), 90);
        assert_eq!(parse_accumulated_minutes(""), 0);
        assert_eq!(parse_accumulated_minutes("n/a"), 0);
        assert_eq!(parse_accumulated_minutes("-5"), 0);
        assert_eq!(parse_accumulated_minutes("12.5"), 0);
    }
}

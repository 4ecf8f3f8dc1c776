use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::RenderHandle;

/// Opaque identifier of the person on duty.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of one duty session.
///
/// `Approved`, `Denied`, and `Canceled` are terminal; a shift entering one
/// of them leaves the registry immediately and the ledger is the permanent
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftStatus {
    Active,
    AwaitingApproval,
    Approved,
    Denied,
    Canceled,
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ShiftStatus::Active => "On duty",
            ShiftStatus::AwaitingApproval => "Awaiting approval",
            ShiftStatus::Approved => "Approved",
            ShiftStatus::Denied => "Denied",
            ShiftStatus::Canceled => "Canceled",
        };
        write!(f, "{label}")
    }
}

/// One duty session for one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub actor: ActorId,
    /// Resolved when the shift starts and frozen for its lifetime; ledger
    /// writes use this name, never a live lookup.
    pub display_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub status: ShiftStatus,
    pub render_handle: Option<RenderHandle>,
}

impl Shift {
    pub fn new(actor: ActorId, display_name: &str, start_time: DateTime<Utc>) -> Self {
        Self {
            actor,
            display_name: display_name.to_string(),
            start_time,
            end_time: None,
            duration_minutes: 0,
            status: ShiftStatus::Active,
            render_handle: None,
        }
    }

    /// Close out the session: records the end time and the whole-minute
    /// duration, floored and clamped at zero.
    pub fn close(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.duration_minutes = duration_minutes(self.start_time, end_time);
        self.status = ShiftStatus::AwaitingApproval;
    }
}

/// Whole minutes between two instants, floored, never negative.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let seconds = end.signed_duration_since(start).num_seconds().max(0);
    (seconds / 60) as u32
}

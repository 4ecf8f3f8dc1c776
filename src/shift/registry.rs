// Shift registry - the only mutable shared state in the crate.
//
// Active and awaiting shifts live behind one async mutex; critical sections
// never await a collaborator, so every mutating operation is atomic and
// distinct actors never block each other across ledger or notifier I/O.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::warn;

use crate::notify::RenderHandle;
use crate::shift::errors::ShiftError;
use crate::shift::types::{ActorId, Shift, ShiftStatus};

#[derive(Default)]
struct RegistryState {
    active: HashMap<ActorId, Shift>,
    awaiting: HashMap<ActorId, Shift>,
}

/// Owner of all in-flight shift records. At most one `Active` and one
/// `AwaitingApproval` shift exist per actor; terminal shifts are removed
/// immediately.
#[derive(Default)]
pub struct ShiftRegistry {
    state: Mutex<RegistryState>,
}

impl ShiftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new shift. Fails with `AlreadyActive` when the actor is
    /// already on duty.
    pub async fn start(
        &self,
        actor: ActorId,
        display_name: &str,
        start_time: DateTime<Utc>,
    ) -> Result<Shift, ShiftError> {
        let mut state = self.state.lock().await;
        if state.active.contains_key(&actor) {
            return Err(ShiftError::AlreadyActive(actor));
        }
        let shift = Shift::new(actor, display_name, start_time);
        state.active.insert(actor, shift.clone());
        Ok(shift)
    }

    pub async fn get_active(&self, actor: ActorId) -> Option<Shift> {
        self.state.lock().await.active.get(&actor).cloned()
    }

    /// Store the render handle on the actor's current shift, active or
    /// awaiting, and return the updated record.
    pub async fn attach_handle(
        &self,
        actor: ActorId,
        handle: RenderHandle,
    ) -> Result<Shift, ShiftError> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        if let Some(shift) = state.active.get_mut(&actor) {
            shift.render_handle = Some(handle);
            Ok(shift.clone())
        } else if let Some(shift) = state.awaiting.get_mut(&actor) {
            shift.render_handle = Some(handle);
            Ok(shift.clone())
        } else {
            Err(ShiftError::NoActiveShift(actor))
        }
    }

    /// Close the actor's active shift and move it to the awaiting set,
    /// computing its duration.
    pub async fn end(&self, actor: ActorId, end_time: DateTime<Utc>) -> Result<Shift, ShiftError> {
        let mut state = self.state.lock().await;
        let mut shift = state
            .active
            .remove(&actor)
            .ok_or(ShiftError::NoActiveShift(actor))?;
        shift.close(end_time);
        if let Some(lost) = state.awaiting.insert(actor, shift.clone()) {
            warn!(
                actor = %actor,
                lost_minutes = lost.duration_minutes,
                "replacing unresolved shift awaiting approval"
            );
        }
        Ok(shift)
    }

    /// Discard the actor's active shift without producing a finished record.
    pub async fn cancel(&self, actor: ActorId) -> Result<Shift, ShiftError> {
        let mut state = self.state.lock().await;
        let mut shift = state
            .active
            .remove(&actor)
            .ok_or(ShiftError::NoActiveShift(actor))?;
        shift.status = ShiftStatus::Canceled;
        Ok(shift)
    }

    pub async fn get_awaiting(&self, actor: ActorId) -> Option<Shift> {
        self.state.lock().await.awaiting.get(&actor).cloned()
    }

    /// Remove and return the actor's awaiting shift once a final decision
    /// has been committed.
    pub async fn resolve(&self, actor: ActorId) -> Result<Shift, ShiftError> {
        let mut state = self.state.lock().await;
        state
            .awaiting
            .remove(&actor)
            .ok_or(ShiftError::NoAwaitingShift(actor))
    }

    pub async fn active_count(&self) -> usize {
        self.state.lock().await.active.len()
    }

    pub async fn awaiting_count(&self) -> usize {
        self.state.lock().await.awaiting.len()
    }
}

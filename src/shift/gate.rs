// Approval gate - single-acquire decision lock per awaiting shift.
//
// The first approve or deny to arrive acquires the actor's slot and
// proceeds; concurrent attempts observe "already being decided" and do
// nothing. A failed approval releases the slot so a corrected retry can
// acquire it again.

use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::shift::types::ActorId;

#[derive(Default)]
pub struct ApprovalGate {
    deciding: Mutex<HashSet<ActorId>>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-wins acquire. Returns false when a decision for this actor's
    /// awaiting shift is already in flight.
    pub async fn try_acquire(&self, actor: ActorId) -> bool {
        self.deciding.lock().await.insert(actor)
    }

    pub async fn release(&self, actor: ActorId) {
        self.deciding.lock().await.remove(&actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_acquire_wins_until_released() {
        let gate = ApprovalGate::new();
        let actor = ActorId(9);

        assert!(gate.try_acquire(actor).await);
        assert!(!gate.try_acquire(actor).await);

        gate.release(actor).await;
        assert!(gate.try_acquire(actor).await);
    }

    #[tokio::test]
    async fn actors_do_not_contend_with_each_other() {
        let gate = ApprovalGate::new();
        assert!(gate.try_acquire(ActorId(1)).await);
        assert!(gate.try_acquire(ActorId(2)).await);
    }
}

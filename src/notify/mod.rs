// Notifier seam - how shift state reaches the people watching it.
//
// The chat platform renders the views; the core only keeps the opaque
// handle it needs to update or remove a rendered shift later.

pub mod format;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::shift::types::{ActorId, ShiftStatus};

pub use format::{human_minutes, platform_timestamp};

/// Opaque reference to a rendered shift view, owned by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(Uuid);

impl RenderHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RenderHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renderable shift states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftView {
    Running {
        display_name: String,
        started: DateTime<Utc>,
    },
    Summary {
        display_name: String,
        started: DateTime<Utc>,
        ended: DateTime<Utc>,
        minutes: u32,
        status: ShiftStatus,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("render handle {0} is gone")]
    HandleGone(RenderHandle),
}

/// Delivery surface for shift views and direct messages.
///
/// `dm` is best-effort everywhere it is used; callers degrade their
/// response instead of failing when it errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn render(&self, view: ShiftView) -> Result<RenderHandle, NotifyError>;

    async fn update(&self, handle: RenderHandle, view: ShiftView) -> Result<(), NotifyError>;

    async fn remove(&self, handle: RenderHandle) -> Result<(), NotifyError>;

    async fn dm(&self, actor: ActorId, text: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn render(&self, view: ShiftView) -> Result<RenderHandle, NotifyError> {
        (**self).render(view).await
    }

    async fn update(&self, handle: RenderHandle, view: ShiftView) -> Result<(), NotifyError> {
        (**self).update(handle, view).await
    }

    async fn remove(&self, handle: RenderHandle) -> Result<(), NotifyError> {
        (**self).remove(handle).await
    }

    async fn dm(&self, actor: ActorId, text: &str) -> Result<(), NotifyError> {
        (**self).dm(actor, text).await
    }
}

// Shared wiring for the integration suites: a recording notifier and
// harnesses that assemble the workflow and roster manager over in-memory
// worksheets.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use duty_roster::{
    ActorId, DutyRosterConfig, InMemoryLedger, Notifier, NotifyError, RenderHandle, RetryPolicy,
    RetryingLedger, RosterManager, ShiftRegistry, ShiftView, ShiftWorkflow, StaffColumns,
};

/// Everything the notifier was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyEvent {
    Rendered { handle: RenderHandle, view: ShiftView },
    Updated { handle: RenderHandle, view: ShiftView },
    Removed { handle: RenderHandle },
    Dm { actor: ActorId, text: String },
}

#[derive(Default)]
struct NotifierState {
    events: Vec<NotifyEvent>,
    live: HashMap<RenderHandle, ShiftView>,
    fail_render: bool,
    fail_dm: bool,
}

/// Notifier double that records calls and tracks which views are still
/// rendered.
#[derive(Default)]
pub struct RecordingNotifier {
    state: Mutex<NotifierState>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, NotifierState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn set_fail_render(&self, fail: bool) {
        self.lock().fail_render = fail;
    }

    pub fn set_fail_dm(&self, fail: bool) {
        self.lock().fail_dm = fail;
    }

    pub fn events(&self) -> Vec<NotifyEvent> {
        self.lock().events.clone()
    }

    pub fn live_views(&self) -> Vec<ShiftView> {
        self.lock().live.values().cloned().collect()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn removal_count(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|event| matches!(event, NotifyEvent::Removed { .. }))
            .count()
    }

    pub fn dms(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                NotifyEvent::Dm { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn render(&self, view: ShiftView) -> Result<RenderHandle, NotifyError> {
        let mut state = self.lock();
        if state.fail_render {
            return Err(NotifyError::Delivery("render unavailable".to_string()));
        }
        let handle = RenderHandle::new();
        state.events.push(NotifyEvent::Rendered {
            handle,
            view: view.clone(),
        });
        state.live.insert(handle, view);
        Ok(handle)
    }

    async fn update(&self, handle: RenderHandle, view: ShiftView) -> Result<(), NotifyError> {
        let mut state = self.lock();
        if !state.live.contains_key(&handle) {
            return Err(NotifyError::HandleGone(handle));
        }
        state.events.push(NotifyEvent::Updated {
            handle,
            view: view.clone(),
        });
        state.live.insert(handle, view);
        Ok(())
    }

    async fn remove(&self, handle: RenderHandle) -> Result<(), NotifyError> {
        let mut state = self.lock();
        if state.live.remove(&handle).is_none() {
            return Err(NotifyError::HandleGone(handle));
        }
        state.events.push(NotifyEvent::Removed { handle });
        Ok(())
    }

    async fn dm(&self, actor: ActorId, text: &str) -> Result<(), NotifyError> {
        let mut state = self.lock();
        if state.fail_dm {
            return Err(NotifyError::Delivery("dms closed".to_string()));
        }
        state.events.push(NotifyEvent::Dm {
            actor,
            text: text.to_string(),
        });
        Ok(())
    }
}

pub type TestLedger = RetryingLedger<Arc<InMemoryLedger>>;

/// Retry wrapper with a generous quota and no jitter so paused-clock tests
/// stay deterministic.
pub fn test_ledger(inner: Arc<InMemoryLedger>) -> TestLedger {
    RetryingLedger::with_quota(inner, 1000, 1000)
        .with_policy(RetryPolicy::new(&[500, 1000, 2500, 5000], 0))
}

pub struct WorkflowHarness {
    pub ledger: Arc<InMemoryLedger>,
    pub notifier: Arc<RecordingNotifier>,
    pub workflow: ShiftWorkflow<TestLedger, Arc<RecordingNotifier>>,
}

/// Workflow over a staff worksheet seeded with `rows`.
pub fn workflow_harness(rows: Vec<Vec<&str>>) -> WorkflowHarness {
    let ledger = Arc::new(InMemoryLedger::with_rows(rows));
    let notifier = Arc::new(RecordingNotifier::new());
    let workflow = ShiftWorkflow::new(
        Arc::new(ShiftRegistry::new()),
        test_ledger(ledger.clone()),
        notifier.clone(),
        StaffColumns::default(),
    );
    WorkflowHarness {
        ledger,
        notifier,
        workflow,
    }
}

pub struct RosterHarness {
    pub staff: Arc<InMemoryLedger>,
    pub employment: Arc<InMemoryLedger>,
    pub notifier: Arc<RecordingNotifier>,
    pub manager: RosterManager<TestLedger, Arc<RecordingNotifier>>,
}

/// Roster manager over seeded staff and employment worksheets.
pub fn roster_harness(staff_rows: Vec<Vec<&str>>) -> RosterHarness {
    let staff = Arc::new(InMemoryLedger::with_rows(staff_rows));
    let employment = Arc::new(InMemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let config = DutyRosterConfig::default();
    let manager = RosterManager::new(
        test_ledger(staff.clone()),
        test_ledger(employment.clone()),
        notifier.clone(),
        config.ledger.columns.clone(),
        &config.roster,
        config.ledger.employment_first_column,
    );
    RosterHarness {
        staff,
        employment,
        notifier,
        manager,
    }
}

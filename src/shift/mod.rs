// Duty shift lifecycle - registry, approval gate, and the workflow that
// drives transitions between them.

pub mod errors;
pub mod gate;
pub mod registry;
pub mod types;
pub mod workflow;

pub use errors::ShiftError;
pub use gate::ApprovalGate;
pub use registry::ShiftRegistry;
pub use types::{duration_minutes, ActorId, Shift, ShiftStatus};
pub use workflow::{Decision, ShiftWorkflow};

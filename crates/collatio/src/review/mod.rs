//! The review workflow: a navigable queue of comparisons, reviewer decisions
//! and the session that ties them to storage.
//!
//! A decision is always persisted before the queue moves on. Skipping and
//! returning to skipped items never touch storage.

mod decision;
mod export;
mod queue;
mod recorder;
mod session;
mod summary;

pub use decision::{PersistedDecision, ReviewDecision, significance_label};
pub use export::{ExportFormat, export_decisions};
pub use queue::{QueueProgress, ReviewQueue};
pub use recorder::DecisionRecorder;
pub use session::{PendingConfirmation, ReviewSession, SessionSnapshot};
pub use summary::DecisionSummary;

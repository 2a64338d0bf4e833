//! Boundary traits for the external services the review workflow talks to.

use crate::collation::CollationReport;
use crate::error::Result;
use crate::review::{PersistedDecision, ReviewDecision};

/// Source of collation reports (the text-collation service).
///
/// Implementations must be thread-safe (Send + Sync) so a review server can
/// share them across requests.
pub trait CollationSource: Send + Sync {
    /// Fetch the current collation report.
    ///
    /// Shape violations are reported as [`crate::CollatioError::DataFormat`];
    /// transport failures as [`crate::CollatioError::Persistence`].
    fn fetch_report(&self) -> Result<CollationReport>;

    /// Get the name of this source (for logging/debugging).
    fn name(&self) -> &str;
}

/// Storage service for review decisions.
pub trait DecisionStore: Send + Sync {
    /// Persist one decision and return the server-confirmed copy.
    ///
    /// Exactly one write per call. Implementations must not retry on their
    /// own; a failure is returned as [`crate::CollatioError::Persistence`] and
    /// the caller decides whether to try again.
    fn save_decision(&self, decision: &ReviewDecision) -> Result<PersistedDecision>;

    /// Load previously persisted decisions, oldest first.
    ///
    /// Stores that cannot enumerate their contents return an empty list.
    fn load_decisions(&self) -> Result<Vec<PersistedDecision>> {
        Ok(Vec::new())
    }

    /// Get the name of this store (for logging/debugging).
    fn name(&self) -> &str;
}

/// Settings store holding the variation-type label list.
///
/// The list is read and written as one unit; there is no partial update.
pub trait VariationTypeStore: Send + Sync {
    /// Fetch the stored list, or `None` if nothing was ever stored.
    fn fetch_types(&self) -> Result<Option<Vec<String>>>;

    /// Replace the stored list. Last write wins.
    fn replace_types(&self, labels: &[String]) -> Result<()>;

    /// Get the name of this store (for logging/debugging).
    fn name(&self) -> &str;
}

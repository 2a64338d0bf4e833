//! Validating and persisting reviewer decisions.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::VariationTypeCatalog;
use crate::collation::WordComparison;
use crate::error::{CollatioError, Result};
use crate::service::DecisionStore;

use super::decision::{PersistedDecision, ReviewDecision};

/// Turns a reviewer verdict into exactly one store write.
///
/// Recording is split in two so callers holding a lock can release it while
/// the write is outstanding:
///
/// 1. [`prepare`](Self::prepare) validates the variation type and snapshots
///    the comparison.
/// 2. [`persist`](Self::persist) performs the single store call.
///
/// There is no automatic retry. A failed write surfaces as
/// [`CollatioError::Persistence`] and the caller decides whether to try again.
#[derive(Clone)]
pub struct DecisionRecorder {
    store: Arc<dyn DecisionStore>,
}

impl DecisionRecorder {
    pub fn new(store: Arc<dyn DecisionStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DecisionStore> {
        &self.store
    }

    /// Validate a verdict against `catalog` and build the decision.
    ///
    /// The store is not touched.
    pub fn prepare(
        &self,
        item: &WordComparison,
        is_significant: bool,
        variation_type: &str,
        catalog: &VariationTypeCatalog,
    ) -> Result<ReviewDecision> {
        if !catalog.contains(variation_type) {
            return Err(CollatioError::Validation(format!(
                "unknown variation type '{}'",
                variation_type
            )));
        }

        Ok(ReviewDecision::new(
            item.clone(),
            is_significant,
            variation_type,
        ))
    }

    /// Write `decision` to the store once.
    pub fn persist(&self, decision: &ReviewDecision) -> Result<PersistedDecision> {
        match self.store.save_decision(decision) {
            Ok(persisted) => {
                debug!(
                    id = %persisted.comparison_id,
                    store = self.store.name(),
                    comparison = %decision.word_comparison(),
                    "recorded decision"
                );
                Ok(persisted)
            }
            Err(e) => {
                warn!(
                    store = self.store.name(),
                    comparison = %decision.word_comparison(),
                    error = %e,
                    "failed to record decision"
                );
                Err(e)
            }
        }
    }

    /// Validate and persist in one step.
    pub fn record(
        &self,
        item: &WordComparison,
        is_significant: bool,
        variation_type: &str,
        catalog: &VariationTypeCatalog,
    ) -> Result<PersistedDecision> {
        let decision = self.prepare(item, is_significant, variation_type, catalog)?;
        self.persist(&decision)
    }
}

impl fmt::Debug for DecisionRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionRecorder")
            .field("store", &self.store.name())
            .finish()
    }
}

//! A single reviewer's session: queue, catalog and recorder together.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::VariationTypeCatalog;
use crate::collation::{CollationNormalizer, WordComparison};
use crate::error::{CollatioError, Result};
use crate::service::CollationSource;

use super::decision::{PersistedDecision, ReviewDecision};
use super::queue::{QueueProgress, ReviewQueue};
use super::recorder::DecisionRecorder;

/// A confirmation that has been validated but not yet persisted.
///
/// Returned by [`ReviewSession::begin_confirm`] and handed back to
/// [`ReviewSession::finish_confirm`] once the store has answered.
#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    index: usize,
    decision: ReviewDecision,
}

impl PendingConfirmation {
    /// Queue index being confirmed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn decision(&self) -> &ReviewDecision {
        &self.decision
    }
}

/// Serializable view of a session for front-ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub current: Option<WordComparison>,
    pub current_confirmed: bool,
    pub progress: QueueProgress,
    pub skip_stack: Vec<usize>,
    pub confirming: bool,
    pub already_recorded: usize,
    pub variation_types: Vec<String>,
}

/// Review session over one collation report.
///
/// Decisions are persisted before the queue advances: if the store rejects a
/// write the cursor, skip stack and completion count stay exactly where they
/// were, so the reviewer can simply try again.
#[derive(Debug)]
pub struct ReviewSession {
    queue: ReviewQueue,
    catalog: VariationTypeCatalog,
    recorder: DecisionRecorder,
    in_flight: Option<usize>,
    already_recorded: usize,
}

impl ReviewSession {
    /// Start a session over `items`.
    pub fn new(
        items: Vec<WordComparison>,
        catalog: VariationTypeCatalog,
        recorder: DecisionRecorder,
    ) -> Self {
        Self {
            queue: ReviewQueue::new(items),
            catalog,
            recorder,
            in_flight: None,
            already_recorded: 0,
        }
    }

    /// Start a session over `items`, leaving out every comparison the
    /// recorder's store already holds a decision for.
    pub fn resume(
        items: Vec<WordComparison>,
        catalog: VariationTypeCatalog,
        recorder: DecisionRecorder,
    ) -> Result<Self> {
        let recorded: HashSet<WordComparison> = recorder
            .store()
            .load_decisions()?
            .into_iter()
            .map(|d| d.word_comparison)
            .collect();

        let total = items.len();
        let remaining: Vec<WordComparison> = items
            .into_iter()
            .filter(|item| !recorded.contains(item))
            .collect();
        let already_recorded = total - remaining.len();

        if already_recorded > 0 {
            info!(
                already_recorded,
                remaining = remaining.len(),
                "resuming review session"
            );
        }

        let mut session = Self::new(remaining, catalog, recorder);
        session.already_recorded = already_recorded;
        Ok(session)
    }

    /// Fetch a report from `source`, normalize it and resume a session over it.
    pub fn open(
        source: &dyn CollationSource,
        normalizer: &CollationNormalizer,
        catalog: VariationTypeCatalog,
        recorder: DecisionRecorder,
    ) -> Result<Self> {
        let report = source.fetch_report()?;
        let items = normalizer.normalize(&report)?;
        debug!(source = source.name(), items = items.len(), "loaded review items");
        Self::resume(items, catalog, recorder)
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    pub fn catalog(&self) -> &VariationTypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut VariationTypeCatalog {
        &mut self.catalog
    }

    pub fn recorder(&self) -> &DecisionRecorder {
        &self.recorder
    }

    pub fn current(&self) -> Option<&WordComparison> {
        self.queue.current()
    }

    pub fn progress(&self) -> QueueProgress {
        self.queue.progress()
    }

    /// Comparisons left out because a decision already existed.
    pub fn already_recorded(&self) -> usize {
        self.already_recorded
    }

    /// Whether a confirmation is waiting on the store.
    pub fn is_confirming(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current: self.queue.current().cloned(),
            current_confirmed: self.queue.is_confirmed(self.queue.cursor()),
            progress: self.queue.progress(),
            skip_stack: self.queue.skip_stack().to_vec(),
            confirming: self.in_flight.is_some(),
            already_recorded: self.already_recorded,
            variation_types: self.catalog.list().to_vec(),
        }
    }

    /// Record a verdict on the current item, then advance.
    pub fn confirm_current(
        &mut self,
        is_significant: bool,
        variation_type: &str,
    ) -> Result<PersistedDecision> {
        let pending = self.begin_confirm(is_significant, variation_type)?;
        let result = self.recorder.persist(&pending.decision);
        self.finish_confirm(pending, result)
    }

    /// Validate a verdict on the current item and mark it in flight.
    ///
    /// Only one confirmation may be outstanding at a time. Skip and back are
    /// still allowed while it is.
    pub fn begin_confirm(
        &mut self,
        is_significant: bool,
        variation_type: &str,
    ) -> Result<PendingConfirmation> {
        if let Some(index) = self.in_flight {
            return Err(CollatioError::Validation(format!(
                "a confirmation for item {} is already in progress",
                index + 1
            )));
        }

        let index = self.queue.cursor();
        let item = self
            .queue
            .current()
            .ok_or_else(|| CollatioError::Validation("no comparison to confirm".to_string()))?;
        if self.queue.is_confirmed(index) {
            return Err(CollatioError::Validation(format!(
                "item {} has already been confirmed",
                index + 1
            )));
        }

        let decision = self
            .recorder
            .prepare(item, is_significant, variation_type, &self.catalog)?;
        self.in_flight = Some(index);

        Ok(PendingConfirmation { index, decision })
    }

    /// Apply the store's answer for `pending`.
    ///
    /// On success the item is marked confirmed (advancing only if the cursor
    /// is still on it). On failure the queue is left untouched and the error
    /// is returned.
    pub fn finish_confirm(
        &mut self,
        pending: PendingConfirmation,
        result: Result<PersistedDecision>,
    ) -> Result<PersistedDecision> {
        if self.in_flight == Some(pending.index) {
            self.in_flight = None;
        }

        let persisted = result?;
        self.queue.confirm_at(pending.index);
        Ok(persisted)
    }

    /// Defer the current item.
    pub fn skip(&mut self) -> bool {
        self.queue.skip()
    }

    /// Return to the most recently skipped item.
    pub fn go_back(&mut self) -> bool {
        self.queue.go_back_to_previous_skipped()
    }
}

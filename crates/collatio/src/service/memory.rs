//! In-process implementation of every service boundary, for tests and demos.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::collation::CollationReport;
use crate::error::{CollatioError, Result};
use crate::review::{PersistedDecision, ReviewDecision};

use super::provider::{CollationSource, DecisionStore, VariationTypeStore};

#[derive(Debug, Default)]
struct MemoryState {
    report: Option<CollationReport>,
    decisions: Vec<PersistedDecision>,
    save_attempts: usize,
    failing_saves: usize,
    types: Option<Vec<String>>,
    type_writes: usize,
    failing_type_writes: usize,
}

/// Memory-backed store with injectable failures.
///
/// Acts as collation source, decision store and variation-type store at once.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given variation types.
    pub fn with_types(labels: &[&str]) -> Self {
        let store = Self::new();
        store.lock().types = Some(labels.iter().map(|s| s.to_string()).collect());
        store
    }

    /// Serve `report` from [`CollationSource::fetch_report`].
    pub fn with_report(self, report: CollationReport) -> Self {
        self.lock().report = Some(report);
        self
    }

    /// Make the next `n` decision saves fail with a persistence error.
    pub fn fail_next_saves(&self, n: usize) {
        self.lock().failing_saves = n;
    }

    /// Make the next `n` variation-type writes fail with a persistence error.
    pub fn fail_next_type_writes(&self, n: usize) {
        self.lock().failing_type_writes = n;
    }

    /// Decisions saved so far, oldest first.
    pub fn saved_decisions(&self) -> Vec<PersistedDecision> {
        self.lock().decisions.clone()
    }

    /// Number of save calls, failed ones included.
    pub fn save_attempts(&self) -> usize {
        self.lock().save_attempts
    }

    /// Currently stored variation types.
    pub fn stored_types(&self) -> Option<Vec<String>> {
        self.lock().types.clone()
    }

    /// Number of successful variation-type writes.
    pub fn type_writes(&self) -> usize {
        self.lock().type_writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CollationSource for MemoryStore {
    fn fetch_report(&self) -> Result<CollationReport> {
        self.lock()
            .report
            .clone()
            .ok_or_else(|| CollatioError::Persistence("no collation report loaded".to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl DecisionStore for MemoryStore {
    fn save_decision(&self, decision: &ReviewDecision) -> Result<PersistedDecision> {
        let mut state = self.lock();
        state.save_attempts += 1;

        if state.failing_saves > 0 {
            state.failing_saves -= 1;
            return Err(CollatioError::Persistence(
                "simulated storage failure".to_string(),
            ));
        }

        let id = format!("cmp_{:04}", state.decisions.len() + 1);
        let persisted = decision.clone().into_persisted(id, Utc::now());
        state.decisions.push(persisted.clone());
        Ok(persisted)
    }

    fn load_decisions(&self) -> Result<Vec<PersistedDecision>> {
        Ok(self.saved_decisions())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl VariationTypeStore for MemoryStore {
    fn fetch_types(&self) -> Result<Option<Vec<String>>> {
        Ok(self.stored_types())
    }

    fn replace_types(&self, labels: &[String]) -> Result<()> {
        let mut state = self.lock();
        if state.failing_type_writes > 0 {
            state.failing_type_writes -= 1;
            return Err(CollatioError::Persistence(
                "simulated settings store failure".to_string(),
            ));
        }

        state.types = Some(labels.to_vec());
        state.type_writes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

//! The variation-type catalog.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CollatioError, Result};
use crate::service::VariationTypeStore;

/// Labels offered when the settings store has never been written.
pub const DEFAULT_VARIATION_TYPES: [&str; 6] = [
    "Different Spelling",
    "Abbreviation",
    "Word Choice",
    "Word Order",
    "Addition",
    "Omission",
];

/// Ordered set of variation-type labels, backed by a settings store.
///
/// The catalog always holds at least one label and never holds duplicates
/// (case-sensitive). Every mutation writes the whole list to the store first
/// and only then updates the in-memory copy, so a failed write leaves the
/// catalog exactly as it was. Callers that must not hold the catalog during
/// the write use `prepare_*`, write [`CatalogChange::labels`] themselves and
/// then [`commit`](Self::commit).
pub struct VariationTypeCatalog {
    labels: Vec<String>,
    store: Arc<dyn VariationTypeStore>,
}

impl VariationTypeCatalog {
    /// Load the catalog from `store`, falling back to the defaults when the
    /// store holds nothing.
    pub fn load(store: Arc<dyn VariationTypeStore>) -> Result<Self> {
        let labels = match store.fetch_types()? {
            Some(labels) if !labels.is_empty() => {
                check_stored(&labels)?;
                labels
            }
            _ => {
                debug!(store = store.name(), "no stored variation types, using defaults");
                DEFAULT_VARIATION_TYPES.iter().map(|s| s.to_string()).collect()
            }
        };

        Ok(Self { labels, store })
    }

    /// Labels in display order.
    pub fn list(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `label` is currently a member (exact match).
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// First label, used as the default selection.
    pub fn first(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// The settings store mutations are written to.
    pub fn store(&self) -> Arc<dyn VariationTypeStore> {
        Arc::clone(&self.store)
    }

    /// Append a new label.
    pub fn add(&mut self, label: &str) -> Result<()> {
        let change = self.prepare_add(label)?;
        self.write_and_commit(change)
    }

    /// Replace the label at `index`.
    pub fn rename(&mut self, index: usize, new_label: &str) -> Result<()> {
        let change = self.prepare_rename(index, new_label)?;
        self.write_and_commit(change)
    }

    /// Remove the label at `index`. The last remaining label cannot be removed.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        let change = self.prepare_delete(index)?;
        self.write_and_commit(change)
    }

    /// Validate an add without touching the store or the catalog.
    pub fn prepare_add(&self, label: &str) -> Result<CatalogChange> {
        let label = self.check_label(label, None)?;

        let mut next = self.labels.clone();
        next.push(label.clone());
        Ok(CatalogChange {
            next,
            kind: ChangeKind::Added(label),
        })
    }

    /// Validate a rename without touching the store or the catalog.
    pub fn prepare_rename(&self, index: usize, new_label: &str) -> Result<CatalogChange> {
        self.check_index(index)?;
        let label = self.check_label(new_label, Some(index))?;

        let mut next = self.labels.clone();
        let old = std::mem::replace(&mut next[index], label.clone());
        Ok(CatalogChange {
            next,
            kind: ChangeKind::Renamed { from: old, to: label },
        })
    }

    /// Validate a delete without touching the store or the catalog.
    pub fn prepare_delete(&self, index: usize) -> Result<CatalogChange> {
        self.check_index(index)?;
        if self.labels.len() == 1 {
            return Err(CollatioError::Validation(
                "at least one variation type must remain".to_string(),
            ));
        }

        let mut next = self.labels.clone();
        let removed = next.remove(index);
        Ok(CatalogChange {
            next,
            kind: ChangeKind::Deleted(removed),
        })
    }

    /// Adopt a prepared change whose list has already been written to the
    /// store.
    ///
    /// Changes must be committed in the order they were prepared; preparing a
    /// second change before the first is committed builds on stale labels.
    pub fn commit(&mut self, change: CatalogChange) {
        match &change.kind {
            ChangeKind::Added(label) => info!(label = %label, "added variation type"),
            ChangeKind::Renamed { from, to } => {
                info!(from = %from, to = %to, "renamed variation type")
            }
            ChangeKind::Deleted(label) => info!(label = %label, "deleted variation type"),
        }
        self.labels = change.next;
    }

    fn write_and_commit(&mut self, change: CatalogChange) -> Result<()> {
        self.store.replace_types(change.labels())?;
        self.commit(change);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.labels.len() {
            return Err(CollatioError::Validation(format!(
                "variation type index {} out of range (catalog has {})",
                index,
                self.labels.len()
            )));
        }
        Ok(())
    }

    /// Trim `label` and reject it if empty or already present at any index
    /// other than `except`.
    fn check_label(&self, label: &str, except: Option<usize>) -> Result<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CollatioError::Validation(
                "variation type must not be empty".to_string(),
            ));
        }

        let duplicate = self
            .labels
            .iter()
            .enumerate()
            .any(|(i, l)| Some(i) != except && l == label);
        if duplicate {
            return Err(CollatioError::Validation(format!(
                "variation type '{}' already exists",
                label
            )));
        }

        Ok(label.to_string())
    }
}

/// A validated catalog mutation: the full list to write, and what changed.
///
/// Produced by the `prepare_*` methods so the store write can happen without
/// holding a borrow of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogChange {
    next: Vec<String>,
    kind: ChangeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChangeKind {
    Added(String),
    Renamed { from: String, to: String },
    Deleted(String),
}

impl CatalogChange {
    /// The whole list as it will be after the change.
    pub fn labels(&self) -> &[String] {
        &self.next
    }
}

impl fmt::Debug for VariationTypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariationTypeCatalog")
            .field("labels", &self.labels)
            .field("store", &self.store.name())
            .finish()
    }
}

fn check_stored(labels: &[String]) -> Result<()> {
    for (i, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(CollatioError::data_format(
                "stored variation types",
                format!("label {} is empty", i),
            ));
        }
        if labels[..i].contains(label) {
            return Err(CollatioError::data_format(
                "stored variation types",
                format!("label '{}' appears more than once", label),
            ));
        }
    }
    Ok(())
}

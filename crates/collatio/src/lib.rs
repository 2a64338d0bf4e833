//! Collatio: review workflow for manuscript collation reports.
//!
//! A collation service compares witnesses of a text verse by verse and reports
//! where they differ. Collatio turns that report into a flat queue of
//! word-level comparisons that a reviewer walks through, classifying each one
//! as significant or not and tagging it with a variation type.
//!
//! # Core Principles
//!
//! - **Stable order**: comparisons appear in report order, verse by verse
//! - **Persist, then advance**: the queue only moves once a decision is stored
//! - **Non-linear review**: items can be skipped and returned to later
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use collatio::{
//!     CollationNormalizer, DecisionRecorder, MemoryStore, ReviewSession,
//!     VariationTypeCatalog,
//! };
//!
//! let store = Arc::new(MemoryStore::new());
//! let items = CollationNormalizer::new()
//!     .normalize_json(r#"{"1": [{"differences": {"w1": "et", "w2": "nunc"}, "position": 3}]}"#)
//!     .unwrap();
//!
//! let catalog = VariationTypeCatalog::load(store.clone()).unwrap();
//! let mut session = ReviewSession::new(items, catalog, DecisionRecorder::new(store.clone()));
//!
//! session.confirm_current(true, "Word Choice").unwrap();
//! assert_eq!(session.progress().completed, 1);
//! ```

pub mod catalog;
pub mod collation;
pub mod config;
pub mod error;
pub mod review;
pub mod service;

pub use catalog::{CatalogChange, DEFAULT_VARIATION_TYPES, VariationTypeCatalog};
pub use collation::{CollationNormalizer, CollationReport, NormalizerConfig, WordComparison};
pub use config::{ReviewConfig, ServiceConfig};
pub use error::{CollatioError, Result};
pub use review::{
    DecisionRecorder, ExportFormat, PersistedDecision, QueueProgress, ReviewDecision, ReviewQueue,
    ReviewSession,
};
pub use service::{CollationSource, DecisionStore, HttpBackend, MemoryStore, VariationTypeStore};

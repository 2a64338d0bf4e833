//! Reviewer verdicts on individual comparisons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collation::WordComparison;

/// A reviewer's verdict on one [`WordComparison`].
///
/// Created once per confirm action and never mutated. The comparison is held
/// by value so the decision stays a faithful snapshot even after the queue
/// that produced it is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    word_comparison: WordComparison,
    is_significant: bool,
    variation_type: String,
    timestamp: DateTime<Utc>,
}

impl ReviewDecision {
    /// Create a decision stamped with the current time.
    pub(crate) fn new(
        word_comparison: WordComparison,
        is_significant: bool,
        variation_type: impl Into<String>,
    ) -> Self {
        Self {
            word_comparison,
            is_significant,
            variation_type: variation_type.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn word_comparison(&self) -> &WordComparison {
        &self.word_comparison
    }

    pub fn is_significant(&self) -> bool {
        self.is_significant
    }

    pub fn variation_type(&self) -> &str {
        &self.variation_type
    }

    /// When the reviewer made the decision.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Attach the identifier and timestamp a store assigned on save.
    pub fn into_persisted(
        self,
        comparison_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> PersistedDecision {
        PersistedDecision {
            comparison_id: comparison_id.into(),
            is_significant: self.is_significant,
            variation_type: self.variation_type,
            word_comparison: self.word_comparison,
            timestamp,
        }
    }
}

/// The server-confirmed copy of a [`ReviewDecision`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDecision {
    /// Identifier assigned by the store.
    pub comparison_id: String,
    pub is_significant: bool,
    pub variation_type: String,
    pub word_comparison: WordComparison,
    /// Timestamp recorded by the store.
    pub timestamp: DateTime<Utc>,
}

/// Human-readable label for a significance flag.
pub fn significance_label(is_significant: bool) -> &'static str {
    if is_significant {
        "Significant"
    } else {
        "Insignificant"
    }
}

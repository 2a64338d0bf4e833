//! Aggregate counts over recorded decisions.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::decision::PersistedDecision;

/// Counts over a set of recorded decisions.
///
/// Per-type and per-witness counts keep the order in which each key first
/// appears in the log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionSummary {
    /// Number of decisions.
    pub total: usize,
    pub significant: usize,
    pub insignificant: usize,
    /// Distinct verses with at least one decision.
    pub verses: usize,
    pub by_type: IndexMap<String, usize>,
    pub by_witness: IndexMap<String, usize>,
}

impl DecisionSummary {
    pub fn from_decisions(decisions: &[PersistedDecision]) -> Self {
        let mut summary = Self::default();
        let mut verses = HashSet::new();

        for decision in decisions {
            summary.total += 1;
            if decision.is_significant {
                summary.significant += 1;
            } else {
                summary.insignificant += 1;
            }

            *summary
                .by_type
                .entry(decision.variation_type.clone())
                .or_insert(0) += 1;
            *summary
                .by_witness
                .entry(decision.word_comparison.manuscript_sigla().to_string())
                .or_insert(0) += 1;
            verses.insert(decision.word_comparison.verse_number());
        }

        summary.verses = verses.len();
        summary
    }

    /// Share of decisions marked significant (0.0 when there are none).
    pub fn significant_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.significant as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::collation::WordComparison;

    fn decision(verse: u32, sigla: &str, significant: bool, ty: &str) -> PersistedDecision {
        PersistedDecision {
            comparison_id: format!("cmp_{verse}"),
            is_significant: significant,
            variation_type: ty.to_string(),
            word_comparison: WordComparison::new(verse, "a", "b", 0, sigla).unwrap(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_counts() {
        let decisions = vec![
            decision(1, "02", true, "Omission"),
            decision(1, "03", false, "Different Spelling"),
            decision(2, "02", true, "Omission"),
        ];

        let summary = DecisionSummary::from_decisions(&decisions);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.significant, 2);
        assert_eq!(summary.insignificant, 1);
        assert_eq!(summary.verses, 2);
        assert_eq!(summary.by_type.get("Omission"), Some(&2));
        assert_eq!(
            summary.by_witness.keys().collect::<Vec<_>>(),
            vec!["02", "03"]
        );
    }

    #[test]
    fn test_empty() {
        let summary = DecisionSummary::from_decisions(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.significant_fraction(), 0.0);
    }
}

//! Flattening of a collation report into an ordered list of comparisons.

use tracing::{debug, warn};

use crate::error::{CollatioError, Result};

use super::comparison::WordComparison;
use super::report::{CollationReport, DiffEntry, VerseCollation, VerseOutcome};

/// Configuration for report normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Placeholder the service uses for the base witness.
    pub base_slot: String,
    /// Placeholder the service uses for the witness being compared.
    pub comparison_slot: String,
    /// Suffix of the uploaded witness file, stripped from resolved names.
    pub container_suffix: String,
    /// Fail instead of falling back to the raw placeholder when a verse's
    /// witness map has no entry for the comparison slot.
    pub strict_sigla: bool,
    /// Drop verses the service failed to collate instead of failing the whole
    /// report.
    pub skip_failed_verses: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            base_slot: "w1".to_string(),
            comparison_slot: "w2".to_string(),
            container_suffix: ".docx".to_string(),
            strict_sigla: false,
            skip_failed_verses: false,
        }
    }
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self, base: impl Into<String>, comparison: impl Into<String>) -> Self {
        self.base_slot = base.into();
        self.comparison_slot = comparison.into();
        self
    }

    pub fn with_container_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.container_suffix = suffix.into();
        self
    }

    pub fn with_strict_sigla(mut self, strict: bool) -> Self {
        self.strict_sigla = strict;
        self
    }

    pub fn with_skip_failed_verses(mut self, skip: bool) -> Self {
        self.skip_failed_verses = skip;
        self
    }
}

/// Converts collation reports into the flat sequence the review queue holds.
#[derive(Debug, Clone, Default)]
pub struct CollationNormalizer {
    config: NormalizerConfig,
}

impl CollationNormalizer {
    /// Create a normalizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Flatten `report` into comparisons, verse order times entry order.
    ///
    /// Entries without a word for both the base and the comparison slot are
    /// not variations and are dropped. Any malformed part of the report fails
    /// the whole call; no partial list is returned.
    pub fn normalize(&self, report: &CollationReport) -> Result<Vec<WordComparison>> {
        let mut comparisons = Vec::with_capacity(report.entry_count());

        for verse in report.verses() {
            let entries = match &verse.outcome {
                VerseOutcome::Diffs(entries) => entries,
                VerseOutcome::Failed { message } => {
                    if self.config.skip_failed_verses {
                        warn!(
                            verse = verse.verse_number,
                            "skipping verse the collation service could not collate: {message}"
                        );
                        continue;
                    }
                    return Err(CollatioError::CollationFailed {
                        verse: verse.verse_number.to_string(),
                        message: message.clone(),
                    });
                }
            };

            let variations: Vec<(usize, &DiffEntry, &str, &str)> = entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    self.words(entry)
                        .map(|(word1, word2)| (index, entry, word1, word2))
                })
                .collect();
            if variations.is_empty() {
                continue;
            }

            // One lookup per verse; verses without variations never reach it.
            let sigla = self.resolve_sigla(verse)?;

            for (index, entry, word1, word2) in variations {
                let position = entry.position.ok_or_else(|| {
                    CollatioError::data_format(
                        format!("verse '{}', entry {}", verse.verse_number, index),
                        "variation entry has no position",
                    )
                })?;

                let comparison =
                    WordComparison::new(verse.verse_number, word1, word2, position, sigla.as_str())
                        .map_err(|e| {
                            CollatioError::data_format(
                                format!("verse '{}', entry {}", verse.verse_number, index),
                                e.to_string(),
                            )
                        })?;
                comparisons.push(comparison);
            }
        }

        debug!(
            verses = report.len(),
            entries = report.entry_count(),
            comparisons = comparisons.len(),
            "normalized collation report"
        );

        Ok(comparisons)
    }

    /// Parse JSON text and normalize it in one step.
    pub fn normalize_json(&self, json: &str) -> Result<Vec<WordComparison>> {
        let report = CollationReport::from_json(json)?;
        self.normalize(&report)
    }

    fn words<'a>(&self, entry: &'a DiffEntry) -> Option<(&'a str, &'a str)> {
        let base = entry.word(&self.config.base_slot)?;
        let other = entry.word(&self.config.comparison_slot)?;
        Some((base, other))
    }

    fn resolve_sigla(&self, verse: &VerseCollation) -> Result<String> {
        let slot = &self.config.comparison_slot;

        if let Some(name) = verse.witness_map.get(slot) {
            let sigla = self.strip_suffix(name);
            if !sigla.trim().is_empty() {
                return Ok(sigla.to_string());
            }
        }

        if self.config.strict_sigla {
            return Err(CollatioError::data_format(
                format!("verse '{}'", verse.verse_number),
                format!("witness map has no entry for '{}'", slot),
            ));
        }

        // Best-effort: the placeholder is not a real sigla, but it keeps the
        // variation reviewable.
        let fallback = self.strip_suffix(slot).to_string();
        warn!(
            verse = verse.verse_number,
            placeholder = %slot,
            "no witness mapping for comparison slot, using placeholder as sigla"
        );
        Ok(fallback)
    }

    fn strip_suffix<'a>(&self, name: &'a str) -> &'a str {
        let suffix = self.config.container_suffix.as_str();
        if suffix.is_empty() {
            return name;
        }
        name.strip_suffix(suffix).unwrap_or(name)
    }
}

//! The word-level comparison record that the review queue is built from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CollatioError, Result};

/// One candidate variation between the base witness and another witness at a
/// specific word position of a verse.
///
/// `word1` and `word2` may be identical: the collation service decides what
/// counts as a difference, and the reviewer judges it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordComparison {
    verse_number: u32,
    word1: String,
    word2: String,
    position: u32,
    manuscript_sigla: String,
}

impl WordComparison {
    /// Create a comparison, rejecting values that break the record's invariants.
    pub fn new(
        verse_number: u32,
        word1: impl Into<String>,
        word2: impl Into<String>,
        position: u32,
        manuscript_sigla: impl Into<String>,
    ) -> Result<Self> {
        let word1 = word1.into();
        let word2 = word2.into();
        let manuscript_sigla = manuscript_sigla.into();

        if verse_number == 0 {
            return Err(CollatioError::Validation(
                "verse number must be at least 1".to_string(),
            ));
        }
        if word1.is_empty() || word2.is_empty() {
            return Err(CollatioError::Validation(format!(
                "compared words must be non-empty (verse {}, position {})",
                verse_number, position
            )));
        }
        if manuscript_sigla.trim().is_empty() {
            return Err(CollatioError::Validation(format!(
                "manuscript sigla must be non-empty (verse {}, position {})",
                verse_number, position
            )));
        }

        Ok(Self {
            verse_number,
            word1,
            word2,
            position,
            manuscript_sigla,
        })
    }

    pub fn verse_number(&self) -> u32 {
        self.verse_number
    }

    /// Word from the base witness.
    pub fn word1(&self) -> &str {
        &self.word1
    }

    /// Word from the comparison witness.
    pub fn word2(&self) -> &str {
        &self.word2
    }

    /// Word index within the verse.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Resolved sigla of the comparison witness.
    pub fn manuscript_sigla(&self) -> &str {
        &self.manuscript_sigla
    }
}

impl fmt::Display for WordComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "verse {}, word {}: '{}' vs '{}' ({})",
            self.verse_number, self.position, self.word1, self.word2, self.manuscript_sigla
        )
    }
}

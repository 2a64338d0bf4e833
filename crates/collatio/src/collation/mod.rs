//! Collation report parsing and normalization.
//!
//! The external collation service returns per-verse diff tables. This module
//! turns them into the flat, ordered list of [`WordComparison`]s that a
//! review session walks through.
//!
//! # Usage
//!
//! ```
//! use collatio::collation::{CollationNormalizer, CollationReport};
//!
//! let report = CollationReport::from_json(
//!     r#"{"1": [{"differences": {"w1": "et", "w2": "nunc"}, "position": 3}],
//!         "witness_maps": {"1": {"w2": "02.docx"}}}"#,
//! )
//! .unwrap();
//!
//! let items = CollationNormalizer::new().normalize(&report).unwrap();
//! assert_eq!(items[0].manuscript_sigla(), "02");
//! ```

mod comparison;
mod normalizer;
mod report;

pub use comparison::WordComparison;
pub use normalizer::{CollationNormalizer, NormalizerConfig};
pub use report::{CollationReport, DiffEntry, VerseCollation, VerseOutcome};

//! Strict parsing of the collation service response.
//!
//! The service answers with a loosely-typed JSON document. Two shapes are in
//! circulation, an envelope with a `differences` key and a flat map whose
//! verse keys sit next to `witness_maps`:
//!
//! ```text
//! { "differences": { "1": [ ... ] }, "witness_maps": { "1": { "w2": "02.docx" } } }
//! { "1": [ ... ], "witness_maps": { "1": { "w2": "02.docx" } } }
//! ```
//!
//! Each verse value is either a list of diff entries or a failure marker
//! `{ "error": "..." }`. Anything else is rejected here, so the normalizer
//! only ever sees well-formed data.

use std::io::Read;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{CollatioError, Result};

const DIFFERENCES_KEY: &str = "differences";
const WITNESS_MAPS_KEY: &str = "witness_maps";
const POSITION_KEY: &str = "position";
const ERROR_KEY: &str = "error";

/// One diff entry of a verse.
///
/// `words` maps witness placeholders (`"w1"`, `"w2"`, ...) to the word each
/// witness has at this position. Placeholders whose value is `null` are
/// left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffEntry {
    pub words: IndexMap<String, String>,
    pub position: Option<u32>,
}

impl DiffEntry {
    /// Word recorded for a witness placeholder, if any.
    pub fn word(&self, placeholder: &str) -> Option<&str> {
        self.words.get(placeholder).map(String::as_str)
    }
}

/// What the collation service produced for one verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseOutcome {
    /// Ordered diff entries.
    Diffs(Vec<DiffEntry>),
    /// The service could not collate this verse.
    Failed { message: String },
}

/// All collation output for a single verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseCollation {
    /// Verse number parsed from the report key.
    pub verse_number: u32,
    pub outcome: VerseOutcome,
    /// Placeholder to witness name, e.g. `"w2" -> "02.docx"`.
    pub witness_map: IndexMap<String, String>,
}

/// A parsed collation report, verses in the order the service emitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollationReport {
    verses: Vec<VerseCollation>,
}

impl CollationReport {
    /// Build a report directly from parsed verses.
    pub fn new(verses: Vec<VerseCollation>) -> Self {
        Self { verses }
    }

    /// Parse a report from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CollatioError::data_format("collation report", e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a report from a reader yielding JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| CollatioError::data_format("collation report", e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a report from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(CollatioError::data_format(
                    "collation report",
                    format!("expected a mapping, found {}", kind(&other)),
                ));
            }
        };

        let witness_maps = match root.shift_remove(WITNESS_MAPS_KEY) {
            None | Some(Value::Null) => IndexMap::new(),
            Some(value) => parse_witness_maps(value)?,
        };

        // The envelope form carries the verses under `differences`.
        let verse_map = if root.contains_key(DIFFERENCES_KEY) {
            match root.shift_remove(DIFFERENCES_KEY) {
                Some(Value::Object(map)) => map,
                Some(other) => {
                    return Err(CollatioError::data_format(
                        "collation report",
                        format!("'differences' must be a mapping, found {}", kind(&other)),
                    ));
                }
                None => Map::new(),
            }
        } else {
            root
        };

        let mut verses = Vec::with_capacity(verse_map.len());
        for (key, value) in verse_map {
            let verse_number = parse_verse_key(&key)?;
            let outcome = parse_outcome(&key, value)?;
            let witness_map = witness_maps.get(&key).cloned().unwrap_or_default();
            verses.push(VerseCollation {
                verse_number,
                outcome,
                witness_map,
            });
        }

        Ok(Self { verses })
    }

    /// Verses in report order.
    pub fn verses(&self) -> &[VerseCollation] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Total number of diff entries across all successfully collated verses.
    pub fn entry_count(&self) -> usize {
        self.verses
            .iter()
            .map(|v| match &v.outcome {
                VerseOutcome::Diffs(entries) => entries.len(),
                VerseOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

fn parse_verse_key(key: &str) -> Result<u32> {
    match key.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CollatioError::data_format(
            format!("verse '{}'", key),
            "verse key must be an integer of at least 1",
        )),
    }
}

fn parse_outcome(key: &str, value: Value) -> Result<VerseOutcome> {
    match value {
        Value::Array(items) => {
            let entries = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| parse_entry(key, i, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(VerseOutcome::Diffs(entries))
        }
        Value::Object(map) if map.len() == 1 && map.contains_key(ERROR_KEY) => {
            let message = match &map[ERROR_KEY] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(VerseOutcome::Failed { message })
        }
        other => Err(CollatioError::data_format(
            format!("verse '{}'", key),
            format!("expected a list of diff entries, found {}", kind(&other)),
        )),
    }
}

fn parse_entry(key: &str, index: usize, value: Value) -> Result<DiffEntry> {
    let context = || format!("verse '{}', entry {}", key, index);

    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(CollatioError::data_format(
                context(),
                format!("expected an object, found {}", kind(&other)),
            ));
        }
    };

    let mut words = IndexMap::new();
    match map.shift_remove(DIFFERENCES_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::Object(diffs)) => {
            for (placeholder, word) in diffs {
                match word {
                    Value::Null => {}
                    Value::String(s) => {
                        words.insert(placeholder, s);
                    }
                    other => {
                        return Err(CollatioError::data_format(
                            context(),
                            format!(
                                "word for '{}' must be a string, found {}",
                                placeholder,
                                kind(&other)
                            ),
                        ));
                    }
                }
            }
        }
        Some(other) => {
            return Err(CollatioError::data_format(
                context(),
                format!("'differences' must be an object, found {}", kind(&other)),
            ));
        }
    }

    let position = match map.shift_remove(POSITION_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                return Err(CollatioError::data_format(
                    context(),
                    format!("position must be a non-negative integer, found {}", n),
                ));
            }
        },
        Some(other) => {
            return Err(CollatioError::data_format(
                context(),
                format!("position must be a number, found {}", kind(&other)),
            ));
        }
    };

    Ok(DiffEntry { words, position })
}

fn parse_witness_maps(value: Value) -> Result<IndexMap<String, IndexMap<String, String>>> {
    let maps = match value {
        Value::Object(maps) => maps,
        other => {
            return Err(CollatioError::data_format(
                "witness_maps",
                format!("expected a mapping, found {}", kind(&other)),
            ));
        }
    };

    let mut parsed = IndexMap::with_capacity(maps.len());
    for (verse, map) in maps {
        let map = match map {
            Value::Object(map) => map,
            other => {
                return Err(CollatioError::data_format(
                    format!("witness_maps '{}'", verse),
                    format!("expected a mapping, found {}", kind(&other)),
                ));
            }
        };

        let mut witnesses = IndexMap::with_capacity(map.len());
        for (placeholder, name) in map {
            match name {
                Value::String(name) => {
                    witnesses.insert(placeholder, name);
                }
                Value::Null => {}
                other => {
                    return Err(CollatioError::data_format(
                        format!("witness_maps '{}'", verse),
                        format!(
                            "witness name for '{}' must be a string, found {}",
                            placeholder,
                            kind(&other)
                        ),
                    ));
                }
            }
        }
        parsed.insert(verse, witnesses);
    }

    Ok(parsed)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

//! File-backed stores: a JSON-lines decision log, a JSON label list and saved
//! collation reports.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::debug;

use crate::collation::CollationReport;
use crate::error::{CollatioError, Result};
use crate::review::{PersistedDecision, ReviewDecision};

use super::provider::{CollationSource, DecisionStore, VariationTypeStore};

/// Decision log stored as one JSON object per line.
///
/// Identifiers are sequential (`cmp_0001`, `cmp_0002`, ...) and continue
/// after whatever the file already holds.
#[derive(Debug)]
pub struct FileDecisionStore {
    path: PathBuf,
    next_id: Mutex<usize>,
}

impl FileDecisionStore {
    /// Open (or prepare to create) the decision log at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let existing = if path.exists() {
            read_decisions(&path)?.len()
        } else {
            0
        };

        Ok(Self {
            path,
            next_id: Mutex::new(existing + 1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionStore for FileDecisionStore {
    fn save_decision(&self, decision: &ReviewDecision) -> Result<PersistedDecision> {
        let mut next_id = self.next_id.lock().unwrap_or_else(|e| e.into_inner());

        ensure_parent(&self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CollatioError::Persistence(format!(
                    "Failed to open decision log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        let persisted = decision
            .clone()
            .into_persisted(format!("cmp_{:04}", *next_id), Utc::now());
        let mut line = serde_json::to_string(&persisted)?;
        line.push('\n');

        let mut writer = BufWriter::new(file);
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| {
                CollatioError::Persistence(format!(
                    "Failed to append to decision log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        *next_id += 1;
        debug!(id = %persisted.comparison_id, path = %self.path.display(), "saved decision");
        Ok(persisted)
    }

    fn load_decisions(&self) -> Result<Vec<PersistedDecision>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_decisions(&self.path)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Read every decision from a JSON-lines log.
pub fn read_decisions(path: impl AsRef<Path>) -> Result<Vec<PersistedDecision>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CollatioError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut decisions = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| CollatioError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let decision = serde_json::from_str(&line).map_err(|e| {
            CollatioError::data_format(
                format!("{} line {}", path.display(), number + 1),
                e.to_string(),
            )
        })?;
        decisions.push(decision);
    }

    Ok(decisions)
}

/// Variation-type list stored as a JSON array, rewritten whole on each change.
#[derive(Debug, Clone)]
pub struct FileTypeStore {
    path: PathBuf,
}

impl FileTypeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VariationTypeStore for FileTypeStore {
    fn fetch_types(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path).map_err(|e| CollatioError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let labels = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CollatioError::data_format(self.path.display().to_string(), e.to_string())
        })?;
        Ok(Some(labels))
    }

    fn replace_types(&self, labels: &[String]) -> Result<()> {
        ensure_parent(&self.path)?;

        // Write to a sibling file and rename so readers never see half a list.
        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| {
            CollatioError::Persistence(format!(
                "Failed to create file '{}': {}",
                tmp.display(),
                e
            ))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, labels).map_err(|e| {
            CollatioError::Persistence(format!("Failed to serialize variation types: {}", e))
        })?;
        writer.flush().map_err(|e| {
            CollatioError::Persistence(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            CollatioError::Persistence(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Collation report previously saved to disk.
#[derive(Debug, Clone)]
pub struct FileCollationSource {
    path: PathBuf,
}

impl FileCollationSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CollationSource for FileCollationSource {
    fn fetch_report(&self) -> Result<CollationReport> {
        let file = File::open(&self.path).map_err(|e| CollatioError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        CollationReport::from_reader(BufReader::new(file))
    }

    fn name(&self) -> &str {
        "file"
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                CollatioError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Default decision log path next to a report file.
///
/// # Example
///
/// ```
/// use collatio::service::decisions_path;
///
/// let path = decisions_path("data/verses.collation.json");
/// assert_eq!(path.to_string_lossy(), "data/verses.decisions.jsonl");
/// ```
pub fn decisions_path(report_path: impl AsRef<Path>) -> PathBuf {
    let report_path = report_path.as_ref();
    let name = report_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let stem = name
        .strip_suffix(".collation.json")
        .or_else(|| name.strip_suffix(".json"))
        .unwrap_or(name.as_str());
    let parent = report_path.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.decisions.jsonl", stem))
}

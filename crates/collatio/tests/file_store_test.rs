//! Integration tests for the file-backed stores.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use collatio::review::{ExportFormat, ReviewSession, export_decisions};
use collatio::service::{
    CollationSource, DecisionStore, FileCollationSource, FileDecisionStore, FileTypeStore,
    VariationTypeStore, decisions_path, read_decisions,
};
use collatio::{CollationNormalizer, DecisionRecorder, VariationTypeCatalog};

const REPORT: &str = r#"{
    "1": [
        {"differences": {"w1": "et", "w2": "nunc"}, "position": 3},
        {"differences": {"w1": "in", "w2": "ad"}, "position": 5}
    ],
    "2": [{"differences": {"w1": "lux", "w2": "lvx"}, "position": 0}],
    "witness_maps": {"1": {"w2": "02.docx"}, "2": {"w2": "02.docx"}}
}"#;

struct Fixture {
    _dir: TempDir,
    report: std::path::PathBuf,
    decisions: std::path::PathBuf,
    types: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let report = dir.path().join("john.collation.json");
    fs::write(&report, REPORT).expect("Failed to write report");
    let decisions = decisions_path(&report);
    let types = dir.path().join("settings").join("variation_types.json");
    Fixture {
        _dir: dir,
        report,
        decisions,
        types,
    }
}

fn open_session(f: &Fixture) -> ReviewSession {
    let types = Arc::new(FileTypeStore::new(&f.types));
    let decisions = Arc::new(FileDecisionStore::open(&f.decisions).unwrap());
    let catalog = VariationTypeCatalog::load(types).unwrap();
    ReviewSession::open(
        &FileCollationSource::new(&f.report),
        &CollationNormalizer::new(),
        catalog,
        DecisionRecorder::new(decisions),
    )
    .unwrap()
}

#[test]
fn test_decisions_path_is_next_to_report() {
    let f = fixture();
    assert_eq!(
        f.decisions.file_name().unwrap().to_string_lossy(),
        "john.decisions.jsonl"
    );
    assert_eq!(f.decisions.parent(), f.report.parent());
}

#[test]
fn test_file_source_reads_report() {
    let f = fixture();
    let report = FileCollationSource::new(&f.report).fetch_report().unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.entry_count(), 3);
}

#[test]
fn test_decisions_append_with_sequential_ids() {
    let f = fixture();
    let mut session = open_session(&f);

    let first = session.confirm_current(true, "Word Choice").unwrap();
    let second = session.confirm_current(false, "Different Spelling").unwrap();

    assert_eq!(first.comparison_id, "cmp_0001");
    assert_eq!(second.comparison_id, "cmp_0002");

    let stored = read_decisions(&f.decisions).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].word_comparison.word2(), "nunc");
    assert!(!stored[1].is_significant);
}

#[test]
fn test_reopened_log_continues_ids_and_resumes() {
    let f = fixture();
    {
        let mut session = open_session(&f);
        session.confirm_current(true, "Omission").unwrap();
    }

    let mut session = open_session(&f);
    assert_eq!(session.already_recorded(), 1);
    assert_eq!(session.queue().len(), 2);
    assert_eq!(session.current().map(|c| c.word2()), Some("ad"));

    let next = session.confirm_current(true, "Omission").unwrap();
    assert_eq!(next.comparison_id, "cmp_0002");

    let store = FileDecisionStore::open(&f.decisions).unwrap();
    assert_eq!(store.load_decisions().unwrap().len(), 2);
}

#[test]
fn test_type_store_round_trip_creates_parent() {
    let f = fixture();
    let store = Arc::new(FileTypeStore::new(&f.types));
    assert!(store.fetch_types().unwrap().is_none());

    let mut catalog = VariationTypeCatalog::load(store.clone()).unwrap();
    catalog.add("Transposition").unwrap();
    catalog.rename(0, "Spelling").unwrap();

    let reloaded = VariationTypeCatalog::load(store).unwrap();
    assert_eq!(reloaded.list(), catalog.list());
    assert_eq!(reloaded.first(), Some("Spelling"));
    assert_eq!(reloaded.list().last().map(String::as_str), Some("Transposition"));
}

#[test]
fn test_corrupt_type_file_is_data_format_error() {
    let f = fixture();
    fs::create_dir_all(f.types.parent().unwrap()).unwrap();
    fs::write(&f.types, r#"["A", "A"]"#).unwrap();

    let err = VariationTypeCatalog::load(Arc::new(FileTypeStore::new(&f.types))).unwrap_err();
    assert!(matches!(err, collatio::CollatioError::DataFormat { .. }));
}

#[test]
fn test_corrupt_decision_line_reports_line_number() {
    let f = fixture();
    fs::write(&f.decisions, "{not json}\n").unwrap();

    let err = read_decisions(&f.decisions).unwrap_err();
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_export_from_log() {
    let f = fixture();
    let mut session = open_session(&f);
    session.confirm_current(true, "Word Choice").unwrap();

    let decisions = read_decisions(&f.decisions).unwrap();
    let mut out = Vec::new();
    export_decisions(&decisions, ExportFormat::Csv, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("cmp_0001,1,3,02,et,nunc,Significant,Word Choice,"));
}

//! Exporting recorded decisions as TSV, CSV or JSON.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CollatioError, Result};

use super::decision::{PersistedDecision, significance_label};

/// Output format for [`export_decisions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Tsv => "tsv",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(ExportFormat::Tsv),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One flattened decision row.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    comparison_id: &'a str,
    verse: u32,
    position: u32,
    witness: &'a str,
    base_word: &'a str,
    variant_word: &'a str,
    significance: &'static str,
    variation_type: &'a str,
    timestamp: String,
}

impl<'a> From<&'a PersistedDecision> for ExportRow<'a> {
    fn from(d: &'a PersistedDecision) -> Self {
        let wc = &d.word_comparison;
        Self {
            comparison_id: &d.comparison_id,
            verse: wc.verse_number(),
            position: wc.position(),
            witness: wc.manuscript_sigla(),
            base_word: wc.word1(),
            variant_word: wc.word2(),
            significance: significance_label(d.is_significant),
            variation_type: &d.variation_type,
            timestamp: d.timestamp.to_rfc3339(),
        }
    }
}

/// Write `decisions` to `writer` in `format`, in the order given.
pub fn export_decisions<W: Write>(
    decisions: &[PersistedDecision],
    format: ExportFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, decisions)?;
            writeln!(writer)
                .and_then(|_| writer.flush())
                .map_err(|e| CollatioError::Persistence(e.to_string()))?;
        }
        ExportFormat::Tsv | ExportFormat::Csv => {
            let delimiter = if format == ExportFormat::Tsv { b'\t' } else { b',' };
            let mut csv_writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(writer);
            for decision in decisions {
                csv_writer.serialize(ExportRow::from(decision))?;
            }
            csv_writer
                .flush()
                .map_err(|e| CollatioError::Persistence(e.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::collation::WordComparison;

    fn decisions() -> Vec<PersistedDecision> {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        vec![PersistedDecision {
            comparison_id: "cmp_0001".to_string(),
            is_significant: true,
            variation_type: "Word Choice".to_string(),
            word_comparison: WordComparison::new(1, "et", "nunc", 3, "02").unwrap(),
            timestamp: stamp,
        }]
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("TSV".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_tsv_export() {
        let mut out = Vec::new();
        export_decisions(&decisions(), ExportFormat::Tsv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some(
                "comparison_id\tverse\tposition\twitness\tbase_word\tvariant_word\tsignificance\tvariation_type\ttimestamp"
            )
        );
        assert_eq!(
            lines.next(),
            Some("cmp_0001\t1\t3\t02\tet\tnunc\tSignificant\tWord Choice\t2024-05-01T10:00:00+00:00")
        );
    }

    #[test]
    fn test_csv_export_quotes_commas() {
        let mut d = decisions();
        d[0].variation_type = "Order, inverted".to_string();
        let mut out = Vec::new();
        export_decisions(&d, ExportFormat::Csv, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"Order, inverted\""));
    }

    #[test]
    fn test_json_export_uses_wire_shape() {
        let mut out = Vec::new();
        export_decisions(&decisions(), ExportFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["comparisonId"], "cmp_0001");
        assert_eq!(value[0]["wordComparison"]["manuscriptSigla"], "02");
    }
}

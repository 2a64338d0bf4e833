//! Normalize command - show the review queue a report produces.

use std::path::PathBuf;

use colored::Colorize;
use collatio::service::FileCollationSource;
use collatio::{CollationNormalizer, CollationSource};

use crate::cli::NormalizeOptions;

pub fn run(
    report: PathBuf,
    options: NormalizeOptions,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !report.exists() {
        return Err(format!("Report file not found: {}", report.display()).into());
    }

    let parsed = FileCollationSource::new(&report).fetch_report()?;
    let normalizer = CollationNormalizer::with_config(options.to_config());
    let items = normalizer.normalize(&parsed)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Review queue for".cyan().bold(),
        report.display().to_string().white()
    );
    println!(
        "  {} verses, {} diff entries, {} comparisons",
        parsed.len(),
        parsed.entry_count(),
        items.len().to_string().white().bold()
    );
    println!();

    if items.is_empty() {
        println!("{}", "No variations to review.".green());
        return Ok(());
    }

    for (i, item) in items.iter().enumerate() {
        println!(
            "{:>5}  {} {:>3}:{:<3} {} {} {}  {}",
            (i + 1).to_string().dimmed(),
            "v".dimmed(),
            item.verse_number(),
            item.position(),
            item.word1().white().bold(),
            "→".dimmed(),
            item.word2().yellow().bold(),
            item.manuscript_sigla().cyan()
        );
    }

    if verbose {
        let config = normalizer.config();
        println!();
        println!(
            "Slots: base '{}', comparison '{}'; suffix '{}'",
            config.base_slot, config.comparison_slot, config.container_suffix
        );
    }

    Ok(())
}

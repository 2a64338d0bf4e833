//! Status command - summarize a decision log.

use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use collatio::review::DecisionSummary;
use collatio::service::read_decisions;

pub fn run(
    decisions: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !decisions.exists() {
        return Err(format!(
            "Decision log not found: {}\nRun 'collatio review <REPORT>' first.",
            decisions.display()
        )
        .into());
    }

    let recorded = read_decisions(&decisions)?;
    let summary = DecisionSummary::from_decisions(&recorded);

    if json_output {
        let status = serde_json::json!({
            "file": decisions.display().to_string(),
            "summary": summary,
            "last_decision": recorded.last().map(|d| d.timestamp.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Review status for".cyan().bold(),
        decisions.display().to_string().white()
    );
    println!();

    if summary.total == 0 {
        println!("{}", "No decisions recorded yet.".yellow());
        return Ok(());
    }

    let fraction = summary.significant_fraction();
    let bar_width = 30;
    let filled = (fraction * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);

    println!(
        "Decisions: {} across {} verses",
        summary.total.to_string().white().bold(),
        summary.verses
    );
    println!(
        "Significant: {} {}/{} ({:.0}%)",
        bar.cyan(),
        summary.significant.to_string().white().bold(),
        summary.total,
        fraction * 100.0
    );
    println!(
        "  {} significant, {} insignificant",
        summary.significant.to_string().red(),
        summary.insignificant.to_string().green()
    );

    println!();
    println!("{}", "By variation type".bold());
    for (label, count) in &summary.by_type {
        println!("  {:<24} {:>5}", label, count);
    }

    println!();
    println!("{}", "By witness".bold());
    for (sigla, count) in &summary.by_witness {
        println!("  {:<24} {:>5}", sigla, count);
    }

    if let Some(last) = recorded.last() {
        println!();
        println!(
            "Last decision: {} ({})",
            last.word_comparison,
            last.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        );
    }

    Ok(())
}

//! Export command - write recorded decisions as TSV, CSV or JSON.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use colored::Colorize;
use collatio::ExportFormat;
use collatio::review::export_decisions;
use collatio::service::read_decisions;

pub fn run(
    decisions: PathBuf,
    output: Option<PathBuf>,
    format: ExportFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !decisions.exists() {
        return Err(format!("Decision log not found: {}", decisions.display()).into());
    }

    let recorded = read_decisions(&decisions)?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            export_decisions(&recorded, format, BufWriter::new(file))?;
            println!(
                "{} {} decisions to {}",
                "Exported".green().bold(),
                recorded.len().to_string().white().bold(),
                path.display().to_string().cyan()
            );
        }
        None => {
            export_decisions(&recorded, format, io::stdout().lock())?;
            if verbose {
                eprintln!("Exported {} decisions as {}", recorded.len(), format);
            }
        }
    }

    Ok(())
}

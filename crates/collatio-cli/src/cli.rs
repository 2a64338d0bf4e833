//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use collatio::ExportFormat;

/// Collatio: review workflow for manuscript collation reports
#[derive(Parser)]
#[command(name = "collatio")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options controlling how a collation report becomes a review queue.
#[derive(Args, Clone, Debug, Default)]
pub struct NormalizeOptions {
    /// Fail when a verse has no witness mapping instead of falling back to the placeholder
    #[arg(long)]
    pub strict_sigla: bool,

    /// Leave out verses the collation service failed on instead of aborting
    #[arg(long)]
    pub skip_failed_verses: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the comparisons a collation report would put in the review queue
    Normalize {
        /// Path to a saved collation report (JSON)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        #[command(flatten)]
        options: NormalizeOptions,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start a local review server
    Review {
        /// Path to a saved collation report (omit to fetch from --service-url)
        #[arg(value_name = "REPORT")]
        report: Option<PathBuf>,

        /// Base URL of the collation and storage services (default: $COLLATIO_SERVICE_URL)
        #[arg(long)]
        service_url: Option<String>,

        /// Decision log (default: <report>.decisions.jsonl next to the report)
        #[arg(short, long)]
        decisions: Option<PathBuf>,

        /// Variation-type file (default: variation_types.json next to the report)
        #[arg(short, long)]
        types: Option<PathBuf>,

        /// Port for the review server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        #[command(flatten)]
        options: NormalizeOptions,
    },

    /// Manage the variation-type list
    Types {
        /// Variation-type file
        #[arg(short, long, default_value = "variation_types.json")]
        types: PathBuf,

        /// Use the settings service at this URL instead of a file
        #[arg(long, conflicts_with = "types")]
        service_url: Option<String>,

        #[command(subcommand)]
        action: Option<TypesAction>,
    },

    /// Summarize a decision log
    Status {
        /// Path to the decision log (JSON lines)
        #[arg(value_name = "DECISIONS")]
        decisions: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export recorded decisions
    Export {
        /// Path to the decision log (JSON lines)
        #[arg(value_name = "DECISIONS")]
        decisions: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: ExportFormat,
    },
}

/// Variation-type list operations. Numbers are the 1-based positions shown by `list`.
#[derive(Subcommand, Clone, Debug)]
pub enum TypesAction {
    /// List variation types
    List,

    /// Add a variation type
    Add {
        /// New label
        label: String,
    },

    /// Rename a variation type
    Rename {
        /// Position in the list
        number: usize,

        /// New label
        label: String,
    },

    /// Delete a variation type
    Delete {
        /// Position in the list
        number: usize,
    },
}

//! Review command - serve a review session over HTTP.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use collatio::config::SERVICE_URL_ENV;
use collatio::service::{FileCollationSource, FileDecisionStore, FileTypeStore, decisions_path};
use collatio::{
    CollationNormalizer, CollationSource, DecisionRecorder, DecisionStore, HttpBackend,
    ReviewConfig, ReviewSession, ServiceConfig, VariationTypeCatalog, VariationTypeStore,
};
use tracing::info;

use crate::cli::NormalizeOptions;
use crate::server::{app, state::AppState};

/// Default variation-type file name, placed next to the report.
pub const TYPES_FILE: &str = "variation_types.json";

pub struct ReviewArgs {
    pub report: Option<PathBuf>,
    pub service_url: Option<String>,
    pub decisions: Option<PathBuf>,
    pub types: Option<PathBuf>,
    pub port: u16,
    pub options: NormalizeOptions,
}

/// The three boundaries a session needs.
struct Backends {
    source: Arc<dyn CollationSource>,
    decisions: Arc<dyn DecisionStore>,
    types: Arc<dyn VariationTypeStore>,
}

pub fn run(args: ReviewArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = review_config(&args)?;
    let backends = resolve_backends(&args, &config)?;
    let normalizer = CollationNormalizer::with_config(config.normalizer.clone());

    if verbose {
        println!(
            "Using {} source, {} decision store, {} type store",
            backends.source.name(),
            backends.decisions.name(),
            backends.types.name()
        );
    }

    let catalog = VariationTypeCatalog::load(backends.types.clone())?;
    let recorder = DecisionRecorder::new(backends.decisions.clone());
    let session = ReviewSession::open(backends.source.as_ref(), &normalizer, catalog, recorder)?;

    let progress = session.progress();
    info!(
        items = progress.total,
        already_recorded = session.already_recorded(),
        "review session ready"
    );

    let url = format!("http://localhost:{}", args.port);
    println!();
    println!(
        "{} {}",
        "Starting review server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    if let Some(report) = &args.report {
        println!("  Report: {}", report.display());
    }
    println!(
        "  Queue: {} comparisons ({} already recorded)",
        progress.total.to_string().white().bold(),
        session.already_recorded()
    );
    println!(
        "  Variation types: {}",
        session.catalog().list().join(", ")
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(session, backends.source.name());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if let Err(e) = app::run_server(state, args.port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}

/// Session settings from the command-line flags, with the service taken
/// from `--service-url` or, when no report is given, the environment.
fn review_config(args: &ReviewArgs) -> Result<ReviewConfig, Box<dyn std::error::Error>> {
    let config = ReviewConfig::new().with_normalizer(args.options.to_config());

    let service = match &args.service_url {
        Some(url) => ServiceConfig::new(url.clone()),
        None if args.report.is_none() && std::env::var(SERVICE_URL_ENV).is_ok() => {
            ServiceConfig::from_env()?
        }
        None => return Ok(config),
    };
    Ok(config.with_service(service))
}

fn resolve_backends(
    args: &ReviewArgs,
    config: &ReviewConfig,
) -> Result<Backends, Box<dyn std::error::Error>> {
    let backend = match &config.service {
        Some(service) => Some(Arc::new(HttpBackend::new(service)?)),
        None => None,
    };

    let report = args.report.as_deref();

    let source: Arc<dyn CollationSource> = match (report, &backend) {
        (Some(report), _) => {
            if !report.exists() {
                return Err(format!("Report file not found: {}", report.display()).into());
            }
            Arc::new(FileCollationSource::new(report))
        }
        (None, Some(backend)) => backend.clone(),
        (None, None) => return Err(missing_source()),
    };

    // Explicit paths win, then the service, then files next to the report.
    let decisions: Arc<dyn DecisionStore> = match (&args.decisions, &backend, report) {
        (Some(path), _, _) => Arc::new(FileDecisionStore::open(path)?),
        (None, Some(backend), _) => backend.clone(),
        (None, None, Some(report)) => Arc::new(FileDecisionStore::open(decisions_path(report))?),
        (None, None, None) => return Err(missing_source()),
    };

    let types: Arc<dyn VariationTypeStore> = match (&args.types, &backend, report) {
        (Some(path), _, _) => Arc::new(FileTypeStore::new(path)),
        (None, Some(backend), _) => backend.clone(),
        (None, None, Some(report)) => Arc::new(FileTypeStore::new(types_path(report))),
        (None, None, None) => return Err(missing_source()),
    };

    Ok(Backends {
        source,
        decisions,
        types,
    })
}

fn missing_source() -> Box<dyn std::error::Error> {
    format!(
        "Provide a REPORT path, --service-url, or set {}",
        SERVICE_URL_ENV
    )
    .into()
}

fn types_path(report: &Path) -> PathBuf {
    report
        .parent()
        .unwrap_or(Path::new("."))
        .join(TYPES_FILE)
}

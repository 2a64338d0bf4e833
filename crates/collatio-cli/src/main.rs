//! Collatio CLI - review manuscript collation reports.

mod cli;
mod commands;
mod server;

use std::env;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Normalize {
            report,
            options,
            json,
        } => commands::normalize::run(report, options, json, cli.verbose),

        Commands::Review {
            report,
            service_url,
            decisions,
            types,
            port,
            options,
        } => commands::review::run(
            commands::review::ReviewArgs {
                report,
                service_url,
                decisions,
                types,
                port,
                options,
            },
            cli.verbose,
        ),

        Commands::Types {
            types,
            service_url,
            action,
        } => commands::types::run(types, service_url, action, cli.verbose),

        Commands::Status { decisions, json } => {
            commands::status::run(decisions, json, cli.verbose)
        }

        Commands::Export {
            decisions,
            output,
            format,
        } => commands::export::run(decisions, output, format, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `COLLATIO_LOG`, formatted per `COLLATIO_LOG_FORMAT`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COLLATIO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "collatio=debug,collatio_cli=debug,info"
        } else {
            "collatio=info,collatio_cli=info,warn"
        })
    });

    let format = env::var("COLLATIO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

//! # convostat CLI
//!
//! Command-line interface for the convostat library.

use std::io;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use convostat::ConvoError;
use convostat::cli::{Args, ReportFormat};
use convostat::loader::load;
use convostat::report::Report;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout only carries the report.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run() -> Result<(), ConvoError> {
    let args = <Args as ClapParser>::parse();
    let config = args.ingest_config();

    tracing::info!(
        dir = %args.dir.display(),
        zone = %config.zone,
        repair = %config.repair,
        "loading conversation"
    );
    let conv = load(&args.dir, &config)?;
    let report = Report::build(&conv, &args.report_options());

    match args.format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

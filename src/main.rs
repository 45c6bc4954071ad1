//! varquery main executable

use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use console::{Emoji, Term};
use varquery::{common, err::QueryError, query, tools};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Genomic variant database client",
    long_about = "This tool queries a remote variant database over gRPC and prints JSON"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a query against the variant database.
    Query(query::cli::Args),
    /// Print the tool declarations.
    Tools(tools::Args),
}

fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    match &cli.command {
        Commands::Query(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(query::cli::run(&cli.common, args))?;
        }
        Commands::Tools(args) => tools::run(&cli.common, args)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    let result = tracing::subscriber::with_default(collector, || run(&cli));
    match result {
        Ok(()) => {
            term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))
                .ok();
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast::<QueryError>() {
            Ok(err) => err.report(),
            Err(err) => {
                eprintln!("Error: {:?}", err);
                ExitCode::FAILURE
            }
        },
    }
}

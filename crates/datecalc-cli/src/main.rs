//! datecalc CLI
//!
//! Answers natural-language date questions from the command line.
//!
//! ```text
//! $ datecalc how long until 2035-04-30
//! {"start_date":"2024-01-01","end_date":"2035-04-30","parser":"how long until","result":{"delta":4137}}
//! ```

mod render;

use std::process::ExitCode;

use anyhow::bail;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use render::Format;

/// datecalc CLI
#[derive(Parser, Debug)]
#[command(name = "datecalc")]
#[command(author, version, about = "Answer natural-language date questions", long_about = None)]
struct Cli {
    /// The question, e.g. "how long until 2035-04-30" (words may be given unquoted)
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, env = "DATECALC_TODAY")]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let query = cli.query.join(" ");
    if query.trim().is_empty() {
        bail!("missing query: ask something like \"how long until 2035-04-30\"");
    }

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(%query, %today, "parsing query");

    match datecalc::run_application_parser(&query, today) {
        Ok(result) => {
            tracing::info!(
                parser = %result.parser,
                delta_days = result.delta_days,
                "query answered"
            );
            println!("{}", render::success(&result, cli.format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::info!(kind = err.kind(), error = %err, "query rejected");
            match cli.format {
                Format::Text => eprintln!("error: {err}"),
                Format::Json | Format::Pretty => {
                    println!("{}", render::failure(&err, cli.format)?);
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

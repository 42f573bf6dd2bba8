use std::path::PathBuf;

use chrono::FixedOffset;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stravex::config::{parse_utc_offset, Config};
use stravex::extract;
use stravex::manifest;

#[derive(Parser)]
#[command(
    name = "stravex",
    version,
    about = "Extracts Strava fitness artifacts from mobile filesystem dumps"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract activities, athletes and routes into a report directory
    Run(RunArgs),
    /// Print the artifact descriptor as JSON
    Describe,
}

#[derive(Args)]
struct RunArgs {
    /// File or directory to search; may be given multiple times
    #[arg(long = "input", required = true, value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Directory receiving the report and exported artifacts
    #[arg(long, value_name = "DIR")]
    report_dir: PathBuf,

    /// UTC offset applied to displayed timestamps, e.g. +02:00
    #[arg(long, default_value = "+00:00", value_parser = parse_utc_offset)]
    tz_offset: FixedOffset,
}

fn main() {
    // Initialize tracing; logs go to stderr, describe output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stravex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Describe => describe(),
        Command::Run(args) => run(args),
    }
}

fn describe() {
    match serde_json::to_string_pretty(&manifest::descriptor()) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            tracing::error!("Cannot serialize descriptor: {}", err);
            std::process::exit(1);
        }
    }
}

fn run(args: RunArgs) {
    let config = Config {
        inputs: args.inputs,
        report_dir: args.report_dir,
        utc_offset: args.tz_offset,
    };
    match extract::run(&config) {
        Ok(summary) => tracing::info!(
            "Extracted {} FIT activities, {} database activities, {} athletes, {} routes",
            summary.fit_activities,
            summary.db_activities,
            summary.athletes,
            summary.routes,
        ),
        Err(err) => {
            tracing::error!("Extraction failed: {}", err);
            std::process::exit(1);
        }
    }
}

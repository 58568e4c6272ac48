use anyhow::{Context, Result};
use argus::{Arguments, Parser, Schema};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status when the command line did not bind cleanly.
const USAGE_EXIT: u8 = 2;

#[derive(Debug, Default, Arguments)]
struct Options {
    #[argus(positional(order = 0, name = "ConfigFile", description = "The path to the config file"))]
    config_file: PathBuf,

    #[argus(named(name = "Date", short = 'd', description = "Sets the execution date (YYYY-MM-DD)"))]
    date: Option<NaiveDate>,

    #[argus(switch(name = "Force", short = 'f', description = "Forces the operation"))]
    force: bool,

    #[argus(switch(name = "Schema", description = "Print the argument schema as JSON and exit"))]
    schema: bool,

    #[argus(positional(order = 1, params, name = "TargetFiles", description = "A list of all target files"))]
    target_files: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let parser = Parser::new();
    let (options, report) = parser
        .parse::<Options, _, _>(std::env::args().skip(1))
        .context("invalid argument declarations")?;

    if options.schema {
        let schema = Schema::of::<Options>()?;
        println!("{}", schema.to_json().context("failed to encode schema")?);
        return Ok(ExitCode::SUCCESS);
    }

    if !report.success() {
        parser.print_usage_stdout::<Options>()?;
        return Ok(ExitCode::from(USAGE_EXIT));
    }

    for field in report.defaulted() {
        tracing::warn!(field, "value could not be converted, using default");
    }

    run(&options);
    Ok(ExitCode::SUCCESS)
}

fn run(options: &Options) {
    tracing::debug!(?options, "executing");

    println!("config file: {}", options.config_file.display());
    match options.date {
        Some(date) => println!("date: {}", date.format("%Y-%m-%d")),
        None => println!("date: (none)"),
    }
    println!("force: {}", options.force);
    println!("targets: {}", options.target_files.join(", "));
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

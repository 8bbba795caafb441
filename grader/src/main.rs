use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarydb_grader::cli::Args;
use librarydb_grader::config::GraderConfig;
use librarydb_grader::error::GraderError;
use librarydb_grader::{assess, load_assignment, write_report};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize logging; `log` records from the libraries are bridged in
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            let code = err
                .downcast_ref::<GraderError>()
                .map(GraderError::exit_code)
                .unwrap_or(2);
            ExitCode::from(code)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = GraderConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let assignment = load_assignment(&config)?;
    tracing::info!(
        "Grading {} on {} (schema {})",
        assignment.name,
        config.database.display_target(),
        config.database.schema
    );

    let report = assess(&config, &assignment).await?;
    write_report(&config, &report).context("writing report")?;

    Ok(if report.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

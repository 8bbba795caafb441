//! LibraryDB grader
//!
//! Wires configuration, the MySQL probe, the assessment engine and report
//! rendering into a single run.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

use std::path::Path;

use assessment_client::MySqlProbe;
use assessment_core::assignment::library_db;
use assessment_core::engine::LogSink;
use assessment_core::{
    AssessmentEngine, AssessmentOptions, AssessmentReport, Assignment, DatabaseProbe,
};
use log::{info, warn};

use crate::config::GraderConfig;
use crate::error::{GraderError, Result};

/// Load the assignment named by the configuration, or the built-in LibraryDB
/// assignment, retargeted at the configured schema
pub fn load_assignment(config: &GraderConfig) -> Result<Assignment> {
    let assignment = match &config.assignment_file {
        Some(path) => Assignment::from_file(path).map_err(GraderError::Assignment)?,
        None => library_db(),
    };
    Ok(assignment.with_schema_name(&config.database.schema))
}

/// Connect, run every check and release the connection.
///
/// A failed connection does not abort the run: every check is still
/// evaluated and reports the connection error. Check filters are validated
/// before connecting.
pub async fn assess(config: &GraderConfig, assignment: &Assignment) -> Result<AssessmentReport> {
    config
        .assessment
        .validate_selection(&assignment.check_ids())
        .map_err(|e| GraderError::InvalidSetting(e.to_string()))?;

    let mut probe = MySqlProbe::connect_or_unavailable(&config.database).await;
    assess_with(&mut probe, &config.assessment, assignment).await
}

/// Run every check over `probe`, then close it whatever the outcome
pub async fn assess_with<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    options: &AssessmentOptions,
    assignment: &Assignment,
) -> Result<AssessmentReport> {
    let outcome = AssessmentEngine::new(probe, assignment, options)
        .run(&mut LogSink)
        .await;

    if let Err(err) = probe.close().await {
        warn!("Failed to close connection: {}", err);
    }
    outcome.map_err(|e| GraderError::InvalidSetting(e.to_string()))
}

/// Render the report and write it to `path`, or stdout when unset
pub fn write_report(config: &GraderConfig, report: &AssessmentReport) -> Result<()> {
    let rendered = config.output.format.formatter().format(report);
    match &config.output.path {
        Some(path) => {
            write_file(path, &rendered)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| GraderError::Output(format!("{}: {}", path.display(), e)))
}

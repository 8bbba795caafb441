//! # Assessment Core
//!
//! Core data structures and the validation engine for grading SQL coursework.
//! This crate knows nothing about a particular database driver: it talks to the
//! database through the [`DatabaseProbe`] trait and turns every probe outcome
//! into exactly one recorded verdict.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assignment;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod probe;
pub mod sql;

/// Re-export common types for ease of use
pub use assignment::Assignment;
pub use config::{AssessmentOptions, DatabaseConfig, DeepCheckPolicy};
pub use engine::{AssessmentEngine, AssessmentReport, CheckResult, ReportSink, Verdict};
pub use error::{AssessmentError, Result};
pub use models::{ExecutionOutcome, ProcedureOutput, SqlValue};
pub use probe::DatabaseProbe;

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

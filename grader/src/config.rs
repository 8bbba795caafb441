//! Grader configuration
//!
//! Layered, lowest precedence first: built-in defaults, an optional config
//! file, `GRADER__`-prefixed environment variables (`GRADER__DATABASE__HOST`),
//! then command-line flags.

use std::path::{Path, PathBuf};

use assessment_core::{AssessmentOptions, DatabaseConfig};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{GraderError, Result};
use crate::output::OutputFormat;

/// Where and how the report is written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,

    /// Report file; stdout when unset
    pub path: Option<PathBuf>,
}

/// Complete grader configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Connection parameters
    pub database: DatabaseConfig,

    /// Run options
    pub assessment: AssessmentOptions,

    /// Report output
    pub output: OutputConfig,

    /// Assignment definition file; the built-in assignment when unset
    pub assignment_file: Option<PathBuf>,
}

impl GraderConfig {
    /// Load defaults, then `path` if given, then the process environment.
    /// Values are not validated here so that command-line flags can still
    /// override them; call [`GraderConfig::validate`] afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("GRADER").separator("__"))
    }

    /// Load with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(GraderError::InvalidSetting(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let config: GraderConfig = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Reject settings no run can use
    pub fn validate(&self) -> Result<()> {
        if self.database.host.trim().is_empty() {
            return Err(GraderError::InvalidSetting("database host is empty".to_string()));
        }
        if self.database.schema.trim().is_empty() {
            return Err(GraderError::InvalidSetting("schema name is empty".to_string()));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(GraderError::InvalidSetting(
                "connect timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

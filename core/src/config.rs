//! Configuration for the core crate
//!
//! Connection parameters and the options that shape an assessment run.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, Result};

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    /// User name
    pub user: String,

    /// Password (may be empty)
    pub password: String,

    /// Schema under assessment
    pub schema: String,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            schema: "LibraryDB".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// Connection timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `user@host:port` for log lines; never includes the password
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

/// How deep-check errors that mean "configuration does not apply" are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepCheckPolicy {
    /// Alias mismatches and procedure errors become skips
    #[default]
    Skip,

    /// Every deep-check error is a failure
    Fail,
}

impl FromStr for DeepCheckPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(DeepCheckPolicy::Skip),
            "fail" => Ok(DeepCheckPolicy::Fail),
            other => Err(format!("unknown deep check policy '{}' (expected skip or fail)", other)),
        }
    }
}

impl fmt::Display for DeepCheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepCheckPolicy::Skip => write!(f, "skip"),
            DeepCheckPolicy::Fail => write!(f, "fail"),
        }
    }
}

/// Options for one assessment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentOptions {
    /// Assess optional procedures as well
    pub include_optional: bool,

    /// Run value-level checks of procedure output
    pub deep_checks: bool,

    /// Reporting policy for inapplicable deep checks
    pub deep_check_policy: DeepCheckPolicy,

    /// When non-empty, only these check ids run
    pub only: Vec<String>,

    /// Check ids that never run
    pub exclude: Vec<String>,
}

impl Default for AssessmentOptions {
    fn default() -> Self {
        AssessmentOptions {
            include_optional: false,
            deep_checks: true,
            deep_check_policy: DeepCheckPolicy::default(),
            only: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl AssessmentOptions {
    /// Whether a check id is selected by the `only` / `exclude` filters
    pub fn is_selected(&self, check_id: &str) -> bool {
        if self.exclude.iter().any(|id| id == check_id) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|id| id == check_id)
    }

    /// Reject `only` / `exclude` ids that name no check of the run
    pub fn validate_selection(&self, check_ids: &[String]) -> Result<()> {
        let unknown: Vec<&str> = self
            .only
            .iter()
            .chain(&self.exclude)
            .filter(|id| !check_ids.iter().any(|known| known == *id))
            .map(String::as_str)
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(AssessmentError::Config(format!(
                "unknown check id(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

//! Command-line arguments

use std::path::PathBuf;

use assessment_core::DeepCheckPolicy;
use clap::Parser;

use crate::config::GraderConfig;
use crate::output::OutputFormat;

/// Grade a LibraryDB submission
#[derive(Parser, Debug, Default)]
#[clap(author, version, about = "Grade a LibraryDB SQL assignment submission")]
pub struct Args {
    /// Config file path (TOML, JSON or YAML)
    #[clap(short, long, env = "GRADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// MySQL host
    #[clap(long, env = "DB_HOST")]
    pub host: Option<String>,

    /// MySQL port
    #[clap(long, env = "DB_PORT")]
    pub port: Option<u16>,

    /// MySQL user
    #[clap(long, env = "DB_USER")]
    pub user: Option<String>,

    /// MySQL password
    #[clap(long, env = "DB_PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Schema to assess
    #[clap(long, env = "DB_NAME")]
    pub schema: Option<String>,

    /// Assignment definition (JSON); defaults to the built-in LibraryDB assignment
    #[clap(short, long)]
    pub assignment: Option<PathBuf>,

    /// Report format
    #[clap(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Also assess optional procedures
    #[clap(long)]
    pub include_optional: bool,

    /// Skip the value-level procedure checks
    #[clap(long)]
    pub no_deep_checks: bool,

    /// How deep checks report inapplicable expectations (skip or fail)
    #[clap(long)]
    pub deep_check_policy: Option<DeepCheckPolicy>,

    /// Run only these check ids
    #[clap(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these check ids
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Connection timeout in seconds
    #[clap(long)]
    pub connect_timeout: Option<u64>,
}

impl Args {
    /// Override configuration values with the ones given on the command line
    pub fn apply(&self, config: &mut GraderConfig) {
        if let Some(host) = &self.host {
            config.database.host = host.clone();
        }
        if let Some(port) = self.port {
            config.database.port = port;
        }
        if let Some(user) = &self.user {
            config.database.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.database.password = password.clone();
        }
        if let Some(schema) = &self.schema {
            config.database.schema = schema.clone();
        }
        if let Some(timeout) = self.connect_timeout {
            config.database.connect_timeout_secs = timeout;
        }
        if let Some(assignment) = &self.assignment {
            config.assignment_file = Some(assignment.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if self.include_optional {
            config.assessment.include_optional = true;
        }
        if self.no_deep_checks {
            config.assessment.deep_checks = false;
        }
        if let Some(policy) = self.deep_check_policy {
            config.assessment.deep_check_policy = policy;
        }
        if !self.only.is_empty() {
            config.assessment.only = self.only.clone();
        }
        if !self.exclude.is_empty() {
            config.assessment.exclude = self.exclude.clone();
        }
    }
}

//! Command-line argument parsing for athenaq.

use crate::config::{ConnectionConfig, QuerySettings};
use crate::error::{AthenaqError, Result};
use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Run a SQL query on AWS Athena and print the results.
#[derive(Parser, Debug)]
#[command(name = "athenaq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQL query to run (required)
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Print results as a bordered table with a header row
    #[arg(short = 't', long, visible_alias = "human-readable")]
    pub table: bool,

    /// S3 location where Athena writes query results
    #[arg(long, value_name = "URI", env = "ATHENA_OUTPUT_LOCATION")]
    pub output_location: Option<String>,

    /// AWS region
    #[arg(long, value_name = "REGION", env = "AWS_REGION")]
    pub region: Option<String>,

    /// Athena workgroup
    #[arg(long, value_name = "NAME", env = "ATHENA_WORKGROUP")]
    pub workgroup: Option<String>,

    /// Default database for unqualified table names
    #[arg(long, value_name = "NAME", env = "ATHENA_DATABASE")]
    pub database: Option<String>,

    /// AWS shared-config profile
    #[arg(long, value_name = "PROFILE")]
    pub aws_profile: Option<String>,

    /// Use named connection from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Rows fetched per result page (1-1000, default 100)
    #[arg(long, value_name = "ROWS")]
    pub page_size: Option<i32>,

    /// Seconds between status polls (default 5)
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Stop waiting (and stop the query) after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log progress to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the query text, rejecting a missing or blank `--query`.
    pub fn query(&self) -> Result<&str> {
        self.query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AthenaqError::config("a query is required (use -q/--query)"))
    }

    /// Returns the selected output format.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_table_flag(self.table)
    }

    /// Converts connection flags (and their environment variables) to a ConnectionConfig.
    pub fn to_connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            region: self.region.clone(),
            output_location: self.output_location.clone(),
            workgroup: self.workgroup.clone(),
            database: self.database.clone(),
            aws_profile: self.aws_profile.clone(),
        }
    }

    /// Converts tuning flags to QuerySettings.
    pub fn to_query_settings(&self) -> QuerySettings {
        QuerySettings {
            page_size: self.page_size,
            poll_interval_secs: self.poll_interval,
            timeout_secs: self.timeout,
        }
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}

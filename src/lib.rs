//! athenaq - run a SQL query on AWS Athena and print the results.
//!
//! This library exposes the core modules for use by the binary and integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod query;
pub mod service;

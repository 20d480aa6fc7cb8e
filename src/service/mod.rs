//! Query service abstraction for athenaq.
//!
//! Provides a trait-based interface to the remote query service so the
//! submit/poll/fetch pipeline can run against Athena or an in-memory script.

mod athena;
mod mock;
mod types;

pub use athena::AthenaService;
pub use mock::{FailingQueryService, MockQueryService, ServiceCall};
pub use types::{
    ColumnInfo, ExecutionId, ExecutionState, ExecutionStatus, ResultPage, ResultSet, Row,
};

use crate::error::Result;
use async_trait::async_trait;

/// Everything the service needs to start an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// SQL text, passed through unchanged.
    pub query: String,

    /// Where the service writes intermediate and final results (e.g. `s3://bucket/prefix/`).
    pub output_location: String,

    /// Workgroup to run in; the service default when `None`.
    pub workgroup: Option<String>,

    /// Default database for unqualified table names.
    pub database: Option<String>,
}

/// Trait defining the calls the pipeline makes against the query service.
///
/// All calls are async and return Results with AthenaqError.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Starts an execution and returns its identifier.
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionId>;

    /// Returns the current status of an execution.
    async fn get_query_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus>;

    /// Fetches one page of results, continuing from `next_token` when given.
    async fn get_query_results(
        &self,
        id: &ExecutionId,
        next_token: Option<&str>,
        max_results: i32,
    ) -> Result<ResultPage>;

    /// Asks the service to stop a running execution.
    async fn stop_query_execution(&self, id: &ExecutionId) -> Result<()>;
}

//! Query submission.

use crate::error::{AthenaqError, Result};
use crate::service::{ExecutionId, QueryRequest, QueryService};
use tracing::info;

/// Settings the service needs before a query can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Result storage location. Required.
    pub output_location: Option<String>,

    /// Athena workgroup.
    pub workgroup: Option<String>,

    /// Default database.
    pub database: Option<String>,
}

impl SubmitOptions {
    /// Returns the output location, rejecting a missing or blank one.
    pub fn require_output_location(&self) -> Result<&str> {
        self.output_location
            .as_deref()
            .filter(|loc| !loc.trim().is_empty())
            .ok_or_else(|| {
                AthenaqError::config(
                    "no output location: set ATHENA_OUTPUT_LOCATION, --output-location, \
                     or output_location in the config file",
                )
            })
    }
}

/// Sends a query to the service and returns its execution id.
pub struct Submitter<'a> {
    service: &'a dyn QueryService,
    options: &'a SubmitOptions,
}

impl<'a> Submitter<'a> {
    pub fn new(service: &'a dyn QueryService, options: &'a SubmitOptions) -> Self {
        Self { service, options }
    }

    /// Builds the service request, rejecting an empty query or a missing output location.
    pub fn request(&self, query: &str) -> Result<QueryRequest> {
        if query.trim().is_empty() {
            return Err(AthenaqError::config("query must not be empty (use -q/--query)"));
        }

        let output_location = self.options.require_output_location()?;

        Ok(QueryRequest {
            query: query.to_string(),
            output_location: output_location.to_string(),
            workgroup: self.options.workgroup.clone(),
            database: self.options.database.clone(),
        })
    }

    /// Submits the query.
    pub async fn submit(&self, query: &str) -> Result<ExecutionId> {
        let request = self.request(query)?;
        let id = self.service.start_query_execution(&request).await?;
        info!(execution_id = %id, output_location = %request.output_location, "Query submitted");
        Ok(id)
    }
}

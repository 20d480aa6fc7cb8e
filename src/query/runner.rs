//! Drives one query through submit, poll and fetch.

use std::time::Duration;

use crate::error::{AthenaqError, Result};
use crate::service::{ExecutionId, QueryService, ResultSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::paginator::{Paginator, DEFAULT_PAGE_SIZE};
use super::poller::{PollOptions, Poller};
use super::submitter::{SubmitOptions, Submitter};

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub submit: SubmitOptions,
    pub poll: PollOptions,
    pub page_size: i32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            submit: SubmitOptions::default(),
            poll: PollOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A completed run.
#[derive(Debug)]
pub struct QueryOutcome {
    /// Execution the results came from.
    pub execution_id: ExecutionId,
    /// The full result set.
    pub result: ResultSet,
    /// Wall time from submission to the last page.
    pub execution_time: Duration,
}

/// Runs queries against a query service.
pub struct QueryRunner<'a> {
    service: &'a dyn QueryService,
    options: &'a RunOptions,
}

impl<'a> QueryRunner<'a> {
    pub fn new(service: &'a dyn QueryService, options: &'a RunOptions) -> Self {
        Self { service, options }
    }

    /// Submits `query`, waits for it, and fetches every result page.
    ///
    /// If the wait times out or is cancelled, the execution is stopped on the
    /// service before the error is returned.
    pub async fn run(&self, query: &str, cancel: &CancellationToken) -> Result<QueryOutcome> {
        let start = Instant::now();

        let id = Submitter::new(self.service, &self.options.submit)
            .submit(query)
            .await?;

        let id = match Poller::new(self.service, self.options.poll)
            .wait(id.clone(), cancel)
            .await
        {
            Ok(id) => id,
            Err(err @ (AthenaqError::Timeout(_) | AthenaqError::Cancelled(_))) => {
                self.stop(&id).await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let paginator = Paginator::new(self.service, self.options.page_size);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AthenaqError::cancelled(format!(
                    "stopped fetching results of query {id}"
                )))
            }
            result = paginator.fetch_all(&id) => result?,
        };
        let execution_time = start.elapsed();

        info!(
            execution_id = %id,
            rows = result.rows.len(),
            pages = result.page_count,
            elapsed_ms = execution_time.as_millis() as u64,
            "Query complete"
        );

        Ok(QueryOutcome {
            execution_id: id,
            result,
            execution_time,
        })
    }

    async fn stop(&self, id: &ExecutionId) {
        match self.service.stop_query_execution(id).await {
            Ok(()) => info!(execution_id = %id, "Stopped query execution"),
            Err(e) => warn!(execution_id = %id, "Could not stop query execution: {e}"),
        }
    }
}

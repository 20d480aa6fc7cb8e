//! Waits for a submitted query to reach a terminal state.
//!
//! QUEUED and RUNNING are polled again after a fixed interval. SUCCEEDED ends the
//! wait; any other state is a query execution error carrying the service's
//! diagnostic text. The caller can bound the wait with a timeout and interrupt it
//! through a cancellation token.

use std::time::Duration;

use crate::error::{AthenaqError, Result};
use crate::service::{ExecutionId, ExecutionState, QueryService};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Fixed delay between status calls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between consecutive status calls. Never grows.
    pub interval: Duration,

    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

/// Polls execution status until the query finishes.
pub struct Poller<'a> {
    service: &'a dyn QueryService,
    options: PollOptions,
}

impl<'a> Poller<'a> {
    pub fn new(service: &'a dyn QueryService, options: PollOptions) -> Self {
        Self { service, options }
    }

    /// Blocks until the execution succeeds, fails, times out, or `cancel` fires.
    ///
    /// Returns the same id on success so it can be handed to the paginator.
    pub async fn wait(&self, id: ExecutionId, cancel: &CancellationToken) -> Result<ExecutionId> {
        let started = Instant::now();
        let deadline = self.options.timeout.map(|timeout| started + timeout);
        let mut polls = 0usize;
        let mut last_state: Option<ExecutionState> = None;

        loop {
            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&id)),
                _ = sleep_until_deadline(deadline) => {
                    return Err(self.timed_out(&id, last_state.as_ref()));
                }
                status = self.service.get_query_execution(&id) => status?,
            };
            polls += 1;
            debug!(execution_id = %id, state = %status.state, polls, "Polled query status");

            if status.state == ExecutionState::Succeeded {
                info!(
                    execution_id = %id,
                    polls,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query succeeded"
                );
                return Ok(id);
            }
            if !status.state.is_pending() {
                return Err(AthenaqError::query_execution(status.diagnostic));
            }
            last_state = Some(status.state);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&id)),
                _ = sleep_until_deadline(deadline) => {
                    return Err(self.timed_out(&id, last_state.as_ref()));
                }
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        }
    }

    fn timed_out(&self, id: &ExecutionId, state: Option<&ExecutionState>) -> AthenaqError {
        let secs = self.options.timeout.unwrap_or_default().as_secs();
        match state {
            Some(state) => AthenaqError::timeout(format!("query {id} still {state} after {secs}s")),
            None => AthenaqError::timeout(format!("no status for query {id} within {secs}s")),
        }
    }
}

/// Completes at `deadline`, or never when there is none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn cancelled(id: &ExecutionId) -> AthenaqError {
    AthenaqError::cancelled(format!("stopped waiting for query {id}"))
}

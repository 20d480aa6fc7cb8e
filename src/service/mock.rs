//! Mock query services for testing.
//!
//! `MockQueryService` replays a scripted sequence of states and result pages and
//! records every call it receives.

use super::{
    ColumnInfo, ExecutionId, ExecutionState, ExecutionStatus, QueryRequest, QueryService,
    ResultPage, Row,
};
use crate::error::{AthenaqError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Start(QueryRequest),
    Status { id: ExecutionId, at: Instant },
    Results {
        id: ExecutionId,
        next_token: Option<String>,
        max_results: i32,
    },
    Stop(ExecutionId),
}

#[derive(Default)]
struct MockState {
    statuses: VecDeque<ExecutionStatus>,
    calls: Vec<ServiceCall>,
}

/// A scripted query service.
///
/// Status calls pop scripted statuses in order; the last one repeats forever.
/// Result pages are served in order, chained with generated continuation tokens.
pub struct MockQueryService {
    execution_id: ExecutionId,
    pages: Vec<ResultPage>,
    fail_submit: Option<String>,
    fail_results_at: Option<usize>,
    state: Mutex<MockState>,
}

impl MockQueryService {
    /// Creates a mock whose query succeeds immediately with no result pages.
    pub fn new() -> Self {
        Self {
            execution_id: ExecutionId::new("mock-execution-1"),
            pages: Vec::new(),
            fail_submit: None,
            fail_results_at: None,
            state: Mutex::new(MockState {
                statuses: VecDeque::from([ExecutionStatus::new(
                    ExecutionState::Succeeded,
                    "State: SUCCEEDED",
                )]),
                calls: Vec::new(),
            }),
        }
    }

    /// Scripts the sequence of states returned by status calls.
    pub fn with_states(self, states: impl IntoIterator<Item = ExecutionState>) -> Self {
        let statuses = states
            .into_iter()
            .map(|state| {
                let diagnostic = format!("State: {state}");
                ExecutionStatus::new(state, diagnostic)
            })
            .collect();
        self.with_statuses(statuses)
    }

    /// Scripts full statuses, including their diagnostic payloads.
    pub fn with_statuses(self, statuses: Vec<ExecutionStatus>) -> Self {
        self.lock().statuses = statuses.into();
        self
    }

    /// Sets the result pages. Continuation tokens are generated.
    pub fn with_pages(mut self, pages: Vec<ResultPage>) -> Self {
        self.pages = pages;
        self
    }

    /// Convenience: one page per entry of `pages`, metadata on the first only.
    pub fn with_rows(self, columns: Vec<ColumnInfo>, pages: Vec<Vec<Row>>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, rows)| {
                let page = ResultPage::with_rows(rows);
                if i == 0 {
                    page.with_columns(columns.clone())
                } else {
                    page
                }
            })
            .collect();
        self.with_pages(pages)
    }

    /// Makes the submit call fail with the given message.
    pub fn failing_submit(mut self, message: impl Into<String>) -> Self {
        self.fail_submit = Some(message.into());
        self
    }

    /// Makes the fetch of page `index` (zero based) fail.
    pub fn failing_results_at(mut self, index: usize) -> Self {
        self.fail_results_at = Some(index);
        self
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.lock().calls.clone()
    }

    /// Returns the instants at which status calls arrived.
    pub fn status_times(&self) -> Vec<Instant> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ServiceCall::Status { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of result fetches received.
    pub fn results_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, ServiceCall::Results { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only happens after a panicking test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn token_for(index: usize) -> String {
        format!("token-{index}")
    }

    fn check_id(&self, id: &ExecutionId) -> Result<()> {
        if *id == self.execution_id {
            Ok(())
        } else {
            Err(AthenaqError::service(format!(
                "InvalidRequestException: QueryExecution {id} was not found"
            )))
        }
    }
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionId> {
        self.lock().calls.push(ServiceCall::Start(request.clone()));
        if let Some(message) = &self.fail_submit {
            return Err(AthenaqError::service(message.clone()));
        }
        Ok(self.execution_id.clone())
    }

    async fn get_query_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus> {
        let mut state = self.lock();
        state.calls.push(ServiceCall::Status {
            id: id.clone(),
            at: Instant::now(),
        });
        drop(state);
        self.check_id(id)?;

        let mut state = self.lock();
        let status = if state.statuses.len() > 1 {
            state.statuses.pop_front()
        } else {
            state.statuses.front().cloned()
        };
        status.ok_or_else(|| AthenaqError::service("no scripted status"))
    }

    async fn get_query_results(
        &self,
        id: &ExecutionId,
        next_token: Option<&str>,
        max_results: i32,
    ) -> Result<ResultPage> {
        self.lock().calls.push(ServiceCall::Results {
            id: id.clone(),
            next_token: next_token.map(String::from),
            max_results,
        });
        self.check_id(id)?;

        let index = match next_token {
            None => 0,
            Some(token) => (1..self.pages.len())
                .find(|i| Self::token_for(*i) == token)
                .ok_or_else(|| {
                    AthenaqError::service(format!(
                        "InvalidRequestException: unknown continuation token {token}"
                    ))
                })?,
        };

        if self.fail_results_at == Some(index) {
            return Err(AthenaqError::service(format!(
                "ThrottlingException: rate exceeded fetching page {index}"
            )));
        }

        let Some(page) = self.pages.get(index) else {
            // A query without pages still answers the first fetch with an empty page.
            return Ok(ResultPage::default());
        };

        let mut page = page.clone();
        page.next_token = (index + 1 < self.pages.len()).then(|| Self::token_for(index + 1));
        Ok(page)
    }

    async fn stop_query_execution(&self, id: &ExecutionId) -> Result<()> {
        self.lock().calls.push(ServiceCall::Stop(id.clone()));
        self.check_id(id)
    }
}

/// A query service whose every call fails, for error-path testing.
pub struct FailingQueryService {
    message: String,
}

impl FailingQueryService {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl QueryService for FailingQueryService {
    async fn start_query_execution(&self, _request: &QueryRequest) -> Result<ExecutionId> {
        Err(AthenaqError::service(self.message.clone()))
    }

    async fn get_query_execution(&self, _id: &ExecutionId) -> Result<ExecutionStatus> {
        Err(AthenaqError::service(self.message.clone()))
    }

    async fn get_query_results(
        &self,
        _id: &ExecutionId,
        _next_token: Option<&str>,
        _max_results: i32,
    ) -> Result<ResultPage> {
        Err(AthenaqError::service(self.message.clone()))
    }

    async fn stop_query_execution(&self, _id: &ExecutionId) -> Result<()> {
        Err(AthenaqError::service(self.message.clone()))
    }
}

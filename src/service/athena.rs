//! AWS Athena implementation of the query service.
//!
//! Thin adapter over `aws-sdk-athena`. Credentials come from the SDK's default
//! provider chain.

use super::{
    ColumnInfo, ExecutionId, ExecutionState, ExecutionStatus, QueryRequest, QueryService,
    ResultPage, Row,
};
use crate::error::{AthenaqError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::config::Region;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionContext, ResultConfiguration};
use aws_sdk_athena::Client;
use tracing::debug;

/// Athena client wrapper.
pub struct AthenaService {
    client: Client,
}

impl AthenaService {
    /// Wraps an already configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads AWS configuration for `region` (and optionally a named profile) and
    /// builds a client.
    pub async fn connect(region: &str, profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;
        debug!(region, profile, "Loaded AWS configuration");
        Self::new(Client::new(&sdk_config))
    }
}

fn service_error<E>(operation: &str, err: E) -> AthenaqError
where
    E: std::error::Error,
{
    AthenaqError::service(format!("{operation} failed: {}", DisplayErrorContext(&err)))
}

#[async_trait]
impl QueryService for AthenaService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionId> {
        let result_configuration = ResultConfiguration::builder()
            .output_location(&request.output_location)
            .build();
        let context = request
            .database
            .as_ref()
            .map(|db| QueryExecutionContext::builder().database(db).build());

        let output = self
            .client
            .start_query_execution()
            .query_string(&request.query)
            .result_configuration(result_configuration)
            .set_work_group(request.workgroup.clone())
            .set_query_execution_context(context)
            .send()
            .await
            .map_err(|e| service_error("StartQueryExecution", e))?;

        output
            .query_execution_id()
            .map(ExecutionId::new)
            .ok_or_else(|| {
                AthenaqError::service("StartQueryExecution returned no query execution id")
            })
    }

    async fn get_query_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(|e| service_error("GetQueryExecution", e))?;

        let execution = output.query_execution().ok_or_else(|| {
            AthenaqError::service(format!("GetQueryExecution returned nothing for {id}"))
        })?;
        let state = execution
            .status()
            .and_then(|status| status.state())
            .map(|state| ExecutionState::parse(state.as_str()))
            .ok_or_else(|| {
                AthenaqError::service(format!("GetQueryExecution returned no state for {id}"))
            })?;

        Ok(ExecutionStatus::new(state, format!("{execution:#?}")))
    }

    async fn get_query_results(
        &self,
        id: &ExecutionId,
        next_token: Option<&str>,
        max_results: i32,
    ) -> Result<ResultPage> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(id.as_str())
            .max_results(max_results)
            .set_next_token(next_token.map(String::from))
            .send()
            .await
            .map_err(|e| service_error("GetQueryResults", e))?;

        let mut page = ResultPage {
            next_token: output.next_token().map(String::from),
            ..Default::default()
        };

        if let Some(result_set) = output.result_set() {
            page.columns = result_set.result_set_metadata().map(|metadata| {
                metadata
                    .column_info()
                    .iter()
                    .map(|c| ColumnInfo::new(c.name(), c.r#type()))
                    .collect()
            });
            page.rows = result_set
                .rows()
                .iter()
                .map(|row| -> Row {
                    row.data()
                        .iter()
                        .map(|datum| datum.var_char_value().map(String::from))
                        .collect()
                })
                .collect();
        }

        Ok(page)
    }

    async fn stop_query_execution(&self, id: &ExecutionId) -> Result<()> {
        self.client
            .stop_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(|e| service_error("StopQueryExecution", e))?;
        Ok(())
    }
}

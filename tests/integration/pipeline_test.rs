//! End-to-end pipeline tests against the mock query service.

use std::time::Duration;

use athenaq::app::execute;
use athenaq::error::AthenaqError;
use athenaq::output::OutputFormat;
use athenaq::query::{PollOptions, RunOptions, SubmitOptions, DEFAULT_POLL_INTERVAL};
use athenaq::service::{
    ColumnInfo, ExecutionState, ExecutionStatus, FailingQueryService, MockQueryService,
    ResultPage, Row, ServiceCall,
};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn cell(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn options() -> RunOptions {
    RunOptions {
        submit: SubmitOptions {
            output_location: Some("s3://athenaq-test/results/".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Service scripted with [QUEUED, RUNNING, SUCCEEDED] and two pages:
/// [["a","1"],["b",null]] then [["c","3"]].
fn two_page_service() -> MockQueryService {
    MockQueryService::new()
        .with_states([
            ExecutionState::Queued,
            ExecutionState::Running,
            ExecutionState::Succeeded,
        ])
        .with_rows(
            vec![
                ColumnInfo::new("letter", "varchar"),
                ColumnInfo::new("num", "integer"),
            ],
            vec![
                vec![vec![cell("a"), cell("1")], vec![cell("b"), None]],
                vec![vec![cell("c"), cell("3")]],
            ],
        )
}

/// Scenario A: line output
/// Given a query that is queued, runs, then succeeds
/// And two result pages
/// When the pipeline runs in line mode
/// Then every row is printed comma-joined with null for the missing cell
#[tokio::test(start_paused = true)]
async fn test_line_mode_end_to_end() {
    let service = two_page_service();
    let mut out = Vec::new();
    let start = Instant::now();

    let outcome = execute(
        &service,
        "SELECT letter, num FROM t",
        &options(),
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "a,1\nb,null\nc,3\n");
    assert_eq!(outcome.result.page_count, 2);
    assert_eq!(start.elapsed(), DEFAULT_POLL_INTERVAL * 2);

    let times = service.status_times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], DEFAULT_POLL_INTERVAL);
    assert_eq!(times[2] - times[1], DEFAULT_POLL_INTERVAL);
}

/// Scenario B: table output
/// Given the same data
/// When the pipeline runs in table mode
/// Then a bordered table with the metadata header and three rows is printed
#[tokio::test(start_paused = true)]
async fn test_table_mode_end_to_end() {
    let service = two_page_service();
    let mut out = Vec::new();

    execute(
        &service,
        "SELECT letter, num FROM t",
        &options(),
        OutputFormat::Table,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let expected = "\
┌────────┬──────┐
│ letter │ num  │
├────────┼──────┤
│ a      │ 1    │
│ b      │ null │
│ c      │ 3    │
└────────┴──────┘
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

/// Given a later page that carries different column metadata
/// When the pipeline runs in table mode
/// Then the header comes from the first page and all rows follow it
#[tokio::test(start_paused = true)]
async fn test_table_header_from_first_page_only() {
    let service = MockQueryService::new().with_pages(vec![
        ResultPage::with_rows(vec![vec![cell("a"), cell("1")]]).with_columns(vec![
            ColumnInfo::new("letter", "varchar"),
            ColumnInfo::new("num", "integer"),
        ]),
        ResultPage::with_rows(vec![vec![cell("b"), cell("2")]]).with_columns(vec![
            ColumnInfo::new("other_column_name", "varchar"),
            ColumnInfo::new("x", "varchar"),
        ]),
    ]);
    let mut out = Vec::new();

    execute(
        &service,
        "SELECT letter, num FROM t",
        &options(),
        OutputFormat::Table,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let expected = "\
┌────────┬─────┐
│ letter │ num │
├────────┼─────┤
│ a      │ 1   │
│ b      │ 2   │
└────────┴─────┘
";
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, expected);
    assert!(!text.contains("other_column_name"));
}

/// Scenario C: failed query
/// Given a query whose status ends in FAILED
/// When the pipeline runs
/// Then it fails with a query execution error carrying the service diagnostic
/// And no page is fetched and nothing is written
#[tokio::test(start_paused = true)]
async fn test_failed_query_produces_no_output() {
    let service = MockQueryService::new()
        .with_statuses(vec![
            ExecutionStatus::new(ExecutionState::Queued, "State: QUEUED"),
            ExecutionStatus::new(ExecutionState::Running, "State: RUNNING"),
            ExecutionStatus::new(
                ExecutionState::Failed,
                "State: FAILED, StateChangeReason: TABLE_NOT_FOUND: line 1:15: Table 'awsdatacatalog.default.nope' does not exist",
            ),
        ])
        .with_rows(vec![ColumnInfo::new("x", "integer")], vec![vec![]]);
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT * FROM nope",
        &options(),
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    match err {
        AthenaqError::QueryExecution(diagnostic) => {
            assert!(diagnostic.contains("TABLE_NOT_FOUND"));
        }
        other => panic!("Expected QueryExecution error, got {other:?}"),
    }
    assert_eq!(service.results_calls(), 0);
    assert!(out.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_query_is_reported_by_service() {
    let service = MockQueryService::new()
        .with_states([ExecutionState::Running, ExecutionState::Cancelled]);
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT 1",
        &options(),
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AthenaqError::QueryExecution(_)));
    assert!(out.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_produces_no_output() {
    let service = two_page_service().failing_results_at(1);
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT letter, num FROM t",
        &options(),
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AthenaqError::Service(_)));
    assert!(out.is_empty(), "partial rows must not be printed");
}

#[tokio::test]
async fn test_service_unavailable() {
    let service = FailingQueryService::new("dispatch failure: connection refused");
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT 1",
        &options(),
        OutputFormat::Table,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AthenaqError::Service(_)));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_missing_output_location_fails_before_submit() {
    let service = two_page_service();
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT 1",
        &RunOptions::default(),
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AthenaqError::Config(_)));
    assert!(service.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_stops_query_without_output() {
    let service = MockQueryService::new().with_states([ExecutionState::Queued]);
    let mut options = options();
    options.poll = PollOptions {
        interval: Duration::from_secs(1),
        timeout: Some(Duration::from_secs(3)),
    };
    let mut out = Vec::new();

    let err = execute(
        &service,
        "SELECT 1",
        &options,
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AthenaqError::Timeout(_)));
    assert!(matches!(service.calls().last(), Some(ServiceCall::Stop(_))));
    assert!(out.is_empty());
}

/// Rows across many small pages keep their order, duplicates included.
#[tokio::test(start_paused = true)]
async fn test_many_pages_preserve_order() {
    let pages: Vec<Vec<Row>> = (0..25)
        .map(|page| {
            (0..4)
                .map(|i| vec![Some(format!("{}", page * 4 + i)), cell("dup")])
                .collect()
        })
        .collect();
    let service = MockQueryService::new()
        .with_rows(vec![ColumnInfo::new("n", "integer")], pages);
    let mut options = options();
    options.page_size = 4;
    let mut out = Vec::new();

    let outcome = execute(
        &service,
        "SELECT n FROM numbers",
        &options,
        OutputFormat::Lines,
        &mut out,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let expected: String = (0..100).map(|n| format!("{n},dup\n")).collect();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
    assert_eq!(outcome.result.page_count, 25);
    assert_eq!(service.results_calls(), 25);
}

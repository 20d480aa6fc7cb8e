//! Types exchanged with the query service.
//!
//! These mirror the shape of Athena's API closely enough to be filled from the SDK,
//! without leaking SDK types into the pipeline.

use std::fmt;

/// Opaque identifier of a query execution, returned on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionId(String);

impl ExecutionId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of a query execution as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// A state this tool does not know about. Treated as a non-success terminal state.
    Other(String),
}

impl ExecutionState {
    /// Parses the service's state name (e.g. `"RUNNING"`).
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Returns the state in the service's spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Other(s) => s,
        }
    }

    /// Returns true while the query has not reached a terminal state.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single status call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    /// Current state.
    pub state: ExecutionState,

    /// The service's full description of the execution, used verbatim in errors.
    pub diagnostic: String,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState, diagnostic: impl Into<String>) -> Self {
        Self {
            state,
            diagnostic: diagnostic.into(),
        }
    }
}

/// Column descriptor from the result metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type as reported by the service (e.g. `varchar`, `bigint`).
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A result row. `None` is a cell that is absent or null.
pub type Row = Vec<Option<String>>;

/// One page of results as returned by a single fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    /// Column metadata, if the service sent it with this page.
    pub columns: Option<Vec<ColumnInfo>>,

    /// Rows in service order.
    pub rows: Vec<Row>,

    /// Continuation token for the next page; `None` on the last page.
    pub next_token: Option<String>,
}

impl ResultPage {
    /// Creates a page with the given rows and no metadata or continuation.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Attaches column metadata.
    pub fn with_columns(mut self, columns: Vec<ColumnInfo>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// The complete result of a query: first-page metadata plus every row in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Column metadata captured from the first page.
    pub columns: Vec<ColumnInfo>,

    /// All rows, pages concatenated in fetch order.
    pub rows: Vec<Row>,

    /// Number of pages fetched.
    pub page_count: usize,
}

impl ResultSet {
    /// Creates a result set with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            page_count: 1,
        }
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

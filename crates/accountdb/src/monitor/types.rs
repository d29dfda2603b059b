use std::fmt;
use std::time::Duration;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other SQL (e.g., DDL)
    Other,
}

impl QueryType {
    /// Detect query type from the first keyword, skipping leading comments such as
    /// the `-- name: ...` annotation carried by generated statements.
    pub fn from_sql(sql: &str) -> Self {
        use crate::sql::{starts_with_keyword, strip_sql_prefix};

        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") || starts_with_keyword(trimmed, "WITH") {
            QueryType::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            QueryType::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            QueryType::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Context information about the query being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL statement sent to Postgres.
    pub sql: String,
    /// Number of parameters.
    pub param_count: usize,
    /// Detected query type.
    pub query_type: QueryType,
    /// Optional query name/tag for identification.
    pub tag: Option<String>,
}

impl QueryContext {
    /// Create a new query context.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
            tag: None,
        }
    }

    /// Add a tag to identify this query.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Maximum length for error messages in `QueryOutcome::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement, as reported to hooks and monitors.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Query returned rows.
    Rows(usize),
    /// Statement affected rows.
    Affected(u64),
    /// Query returned a single optional row.
    OptionalRow(bool),
    /// Statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryOutcome {
    /// Create an error outcome, truncating the message.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            let truncated = super::truncate_sql_bytes(&msg, MAX_ERROR_LEN);
            Self::Error(format!("{truncated}..."))
        } else {
            Self::Error(msg)
        }
    }

    /// Whether the statement failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::Rows(n) => write!(f, "{n} rows"),
            QueryOutcome::Affected(n) => write!(f, "{n} affected"),
            QueryOutcome::OptionalRow(found) => {
                write!(f, "{}", if *found { "1 row" } else { "0 rows" })
            }
            QueryOutcome::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for monitoring SQL query execution.
pub trait QueryMonitor: Send + Sync {
    /// Called before a query is executed.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called after a query completes (success or failure).
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, outcome: &QueryOutcome);

    /// Called when a query exceeds the configured slow threshold.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}

/// Action to take after a hook inspects a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Run the statement.
    Continue,
    /// Refuse the statement; the caller receives a validation error.
    Abort(String),
}

/// Trait for hooking into the query execution lifecycle.
pub trait QueryHook: Send + Sync {
    /// Called before a query is executed.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a query completes, before monitors receive the event.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _outcome: &QueryOutcome) {}
}

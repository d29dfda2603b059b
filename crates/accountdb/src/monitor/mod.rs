//! Query monitoring and hooks for SQL execution.
//!
//! Nothing here is active unless the caller wraps its client in an
//! [`InstrumentedClient`]. The generated query functions tag every statement with its
//! query name (`GetAccount`, `ListAccounts`, ...), which hooks and monitors receive in
//! [`QueryContext::tag`].
//!
//! # Example
//!
//! ```rust,ignore
//! use accountdb::monitor::{InstrumentedClient, StatsMonitor, TracingSqlHook};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let stats = Arc::new(StatsMonitor::new());
//! let client = InstrumentedClient::new(db_client)
//!     .with_slow_query_threshold(Duration::from_millis(250))
//!     .with_monitor_arc(stats.clone())
//!     .with_hook(TracingSqlHook::new());
//!
//! let account = accountdb::queries::account::get_account(&client, &params).await?;
//! println!("{:?}", stats.stats());
//! ```

mod instrumented;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;


pub use instrumented::InstrumentedClient;
pub use monitors::{QueryStats, StatsMonitor};
pub use types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryOutcome, QueryType};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

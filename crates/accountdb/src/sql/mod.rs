//! SQL statements with bound parameters.
//!
//! - [`Query`] wraps a fixed statement that already contains `$1, $2, ...`.
//! - [`Sql`] composes a statement piece by piece and numbers placeholders itself,
//!   which is how variable-length `IN (...)` groups are produced.
//!
//! # Example
//!
//! ```ignore
//! use accountdb::sql;
//!
//! let mut q = sql("SELECT pk, id FROM account WHERE id IN (");
//! q.try_push_bind_list("ids", ids)?;
//! q.push(")");
//!
//! let rows = q.fetch_all(&conn).await?;
//! ```

#[macro_use]
mod exec_macros;

mod builder;
mod placeholder;
mod query;


pub use builder::Sql;
pub use placeholder::{MAX_PLACEHOLDER, expand_placeholder_group, highest_placeholder};
pub use query::Query;

/// Build a SQL query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(initial_sql: impl Into<String>) -> Query {
    Query::new(initial_sql)
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses
/// from a SQL string to find the first meaningful keyword.
pub(crate) fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            if let Some(pos) = s.find('\n') {
                s = &s[pos + 1..];
                continue;
            }
            return "";
        }
        if s.starts_with("/*") {
            if let Some(pos) = s.find("*/") {
                s = &s[pos + 2..];
                continue;
            }
            return "";
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

pub(crate) fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

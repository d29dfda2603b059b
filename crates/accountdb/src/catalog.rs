//! Annotated SQL source files.
//!
//! Query files hold one statement per `-- name: <Name> :<kind>` header:
//!
//! ```sql
//! -- name: GetAccount :one
//! SELECT pk, id, display_name, email FROM account WHERE id = $1;
//! ```
//!
//! The generated modules embed each statement with its header line, and expose a
//! `CATALOG` of [`NamedQuery`] so the embedded text can be checked against the source.

use crate::error::{DbError, DbResult};
use heck::ToSnakeCase;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

const NAME_PREFIX: &str = "-- name:";

/// How a statement's result is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Zero or one row.
    One,
    /// Any number of rows.
    Many,
    /// No rows; only the execution result.
    Exec,
    /// No rows; the affected row count.
    ExecRows,
}

impl QueryKind {
    /// Parse the annotation suffix (without the leading `:`).
    pub fn from_annotation(s: &str) -> DbResult<Self> {
        match s {
            "one" => Ok(Self::One),
            "many" => Ok(Self::Many),
            "exec" => Ok(Self::Exec),
            "execrows" => Ok(Self::ExecRows),
            _ => Err(DbError::validation(format!("unknown query kind: :{s}"))),
        }
    }

    /// The annotation suffix, without the leading `:`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Many => "many",
            Self::Exec => "exec",
            Self::ExecRows => "execrows",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

/// A named statement, either parsed from a query file or embedded in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: Cow<'static, str>,
    pub kind: QueryKind,
    /// Statement text. Embedded statements start with their `-- name:` header line.
    pub sql: Cow<'static, str>,
}

impl NamedQuery {
    /// An embedded statement.
    pub const fn embedded(name: &'static str, kind: QueryKind, sql: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind,
            sql: Cow::Borrowed(sql),
        }
    }

    /// The Rust function name generated for this statement (`GetAccount` -> `get_account`).
    pub fn fn_name(&self) -> String {
        self.name.to_snake_case()
    }

    /// The header line, e.g. `-- name: GetAccount :one`.
    pub fn header(&self) -> String {
        format!("{NAME_PREFIX} {} {}", self.name, self.kind)
    }

    /// The statement without its header line.
    pub fn body(&self) -> &str {
        let sql = self.sql.trim_start();
        match sql.strip_prefix(NAME_PREFIX) {
            Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body).trim(),
            None => sql.trim(),
        }
    }
}

/// Parse an annotated query file.
///
/// Statements keep their line breaks; surrounding whitespace and a trailing `;` are
/// removed. Comments and blank lines before the first header are allowed, anything
/// else is an error. Names must be unique within the file.
pub fn parse_annotated_sql(content: &str) -> DbResult<Vec<NamedQuery>> {
    let mut queries: Vec<NamedQuery> = Vec::new();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    let mut current: Option<(String, QueryKind, usize)> = None;
    let mut sql_lines: Vec<&str> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_start();

        if let Some(rest) = trimmed.strip_prefix(NAME_PREFIX) {
            if let Some((name, kind, decl_line)) = current.take() {
                queries.push(finish(name, kind, decl_line, &mut sql_lines)?);
            }

            let (name, kind) = parse_header(rest, line_no)?;
            if let Some(prev) = seen.insert(name.clone(), line_no) {
                return Err(DbError::validation(format!(
                    "duplicate query name {name} at line {line_no}, previously defined at line {prev}"
                )));
            }
            current = Some((name, kind, line_no));
            continue;
        }

        if current.is_none() {
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            return Err(DbError::validation(format!(
                "unexpected SQL before first `{NAME_PREFIX}` at line {line_no}"
            )));
        }

        sql_lines.push(line);
    }

    if let Some((name, kind, decl_line)) = current.take() {
        queries.push(finish(name, kind, decl_line, &mut sql_lines)?);
    }

    if queries.is_empty() {
        return Err(DbError::validation("no queries found"));
    }

    Ok(queries)
}

fn parse_header(rest: &str, line_no: usize) -> DbResult<(String, QueryKind)> {
    let mut parts = rest.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(DbError::validation(format!(
            "missing query name after `{NAME_PREFIX}` at line {line_no}"
        )));
    };
    let Some(kind_raw) = parts.next() else {
        return Err(DbError::validation(format!(
            "missing query kind (e.g. :one/:many) after {name} at line {line_no}"
        )));
    };
    if parts.next().is_some() {
        return Err(DbError::validation(format!(
            "unexpected tokens in query header at line {line_no}"
        )));
    }

    let kind_raw = kind_raw.strip_prefix(':').ok_or_else(|| {
        DbError::validation(format!("invalid query kind {kind_raw} at line {line_no}"))
    })?;

    Ok((name.to_string(), QueryKind::from_annotation(kind_raw)?))
}

fn finish(
    name: String,
    kind: QueryKind,
    decl_line: usize,
    sql_lines: &mut Vec<&str>,
) -> DbResult<NamedQuery> {
    let joined = sql_lines.drain(..).collect::<Vec<_>>().join("\n");
    let sql = joined.trim().trim_end_matches(';').trim_end();
    if sql.is_empty() {
        return Err(DbError::validation(format!(
            "empty SQL body for query {name} at line {decl_line}"
        )));
    }
    Ok(NamedQuery {
        name: Cow::Owned(name),
        kind,
        sql: Cow::Owned(sql.to_string()),
    })
}

//! Typed functions for the statements in `sql/queries/`.
//!
//! One module per query file. Each function binds its parameter struct in statement
//! order, tags the statement with its query name and maps the returned rows.

pub mod account;

//! # accountdb
//!
//! Typed PostgreSQL access for the `account` table, generated from the annotated
//! statements in `sql/queries/account.sql`.
//!
//! ## Features
//!
//! - **One function per statement**: `get_account`, `list_accounts`, `create_account`,
//!   `update_account_display_name`, `get_accounts`
//! - **Typed rows**: storage columns (`display_name`) map to Rust fields and serialize
//!   with API names (`displayName`); SQL `NULL` stays `None`
//! - **Variadic `IN` lists**: one placeholder per value, numbered after the statement's
//!   own placeholders; an empty list is rejected before anything is sent
//! - **Bring your own client**: every function takes `&impl GenericClient`, so a plain
//!   connection, a pooled connection or a transaction all work
//! - **Query monitoring**: optional hooks and monitors, with a `tracing` hook
//!
//! ```ignore
//! use accountdb::queries::account::{self, GetAccountParams, GetAccountsParams};
//!
//! let config = accountdb::DbConfig::from_env()?;
//! let client = accountdb::connect(&config).await?;
//!
//! let one = account::get_account(&client, &GetAccountParams { account_id: "a".into() }).await?;
//! let many = account::get_accounts(
//!     &client,
//!     &GetAccountsParams { ids: vec!["a".into(), "b".into()] },
//! )
//! .await?;
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod queries;
pub mod result;
pub mod row;
pub mod sql;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(test)]
mod test_support;

pub use catalog::{NamedQuery, QueryKind, parse_annotated_sql};
pub use client::GenericClient;
pub use config::{DbConfig, connect};
pub use error::{DbError, DbResult};
pub use models::Account;
pub use monitor::{
    HookAction, InstrumentedClient, QueryContext, QueryHook, QueryMonitor, QueryOutcome,
    QueryStats, QueryType, StatsMonitor,
};
pub use result::{ExecResult, ResultMeta, ResultSet};
pub use row::{FromRow, RowExt};
pub use sql::{Query, Sql, query, sql};

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_manager_config, create_pool_with_tls};

//! A `GenericClient` that records statements instead of running them.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub tag: Option<String>,
    pub sql: String,
    /// `Debug` rendering of each bound value, in bind order.
    pub params: Vec<String>,
}

#[derive(Default)]
pub(crate) struct RecordingClient {
    calls: Mutex<Vec<Recorded>>,
    affected: u64,
    fail_with: Option<String>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    /// Every statement is recorded, then fails with `DbError::Other(message)`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single_call(&self) -> Recorded {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one statement, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    fn record(&self, tag: Option<&str>, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<()> {
        self.calls.lock().unwrap().push(Recorded {
            tag: tag.map(str::to_string),
            sql: sql.to_string(),
            params: params.iter().map(|p| format!("{p:?}")).collect(),
        });
        match &self.fail_with {
            Some(message) => Err(DbError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.record(None, sql, params)?;
        Ok(vec![])
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Vec<Row>> {
        self.record(Some(tag), sql, params)?;
        Ok(vec![])
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Option<Row>> {
        self.record(None, sql, params)?;
        Ok(None)
    }

    async fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Option<Row>> {
        self.record(Some(tag), sql, params)?;
        Ok(None)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        self.record(None, sql, params)?;
        Ok(self.affected)
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<u64> {
        self.record(Some(tag), sql, params)?;
        Ok(self.affected)
    }
}

use super::types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryOutcome};
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A `GenericClient` wrapper that runs hooks and reports to monitors around every
/// statement.
///
/// Hooks run in the order they were added. The first hook to return
/// [`HookAction::Abort`] stops the statement; later hooks are not consulted and the
/// inner client is never called. Timing is only taken when at least one monitor or
/// hook is attached.
pub struct InstrumentedClient<C> {
    client: C,
    monitors: Vec<Arc<dyn QueryMonitor>>,
    hooks: Vec<Arc<dyn QueryHook>>,
    slow_query_threshold: Option<Duration>,
}

impl<C: GenericClient> InstrumentedClient<C> {
    /// Wrap `client` with no hooks or monitors attached.
    pub fn new(client: C) -> Self {
        Self {
            client,
            monitors: Vec::new(),
            hooks: Vec::new(),
            slow_query_threshold: None,
        }
    }

    pub fn with_monitor<M: QueryMonitor + 'static>(self, monitor: M) -> Self {
        self.with_monitor_arc(Arc::new(monitor))
    }

    /// Attach a shared monitor, e.g. a [`StatsMonitor`](super::StatsMonitor) the caller
    /// keeps a handle to.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitors.push(monitor);
        self
    }

    /// Append a hook after any already attached.
    pub fn with_hook<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Statements slower than `threshold` are also reported to
    /// [`QueryMonitor::on_slow_query`].
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Whether any hook or monitor is attached.
    pub fn is_instrumented(&self) -> bool {
        !self.monitors.is_empty() || !self.hooks.is_empty()
    }

    pub fn slow_query_threshold(&self) -> Option<Duration> {
        self.slow_query_threshold
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    fn before(&self, ctx: &QueryContext) -> DbResult<()> {
        for hook in &self.hooks {
            if let HookAction::Abort(reason) = hook.before_query(ctx) {
                return Err(DbError::validation(format!(
                    "Query aborted by hook: {reason}"
                )));
            }
        }
        for monitor in &self.monitors {
            monitor.on_query_start(ctx);
        }
        Ok(())
    }

    fn after(&self, ctx: &QueryContext, duration: Duration, outcome: &QueryOutcome) {
        for hook in &self.hooks {
            hook.after_query(ctx, duration, outcome);
        }

        let slow = self
            .slow_query_threshold
            .is_some_and(|threshold| duration > threshold);
        for monitor in &self.monitors {
            monitor.on_query_complete(ctx, duration, outcome);
            if slow {
                monitor.on_slow_query(ctx, duration);
            }
        }
    }

    async fn instrument<T, Fut>(
        &self,
        sql: &str,
        param_count: usize,
        tag: Option<&str>,
        run: Fut,
        outcome_of: fn(&T) -> QueryOutcome,
    ) -> DbResult<T>
    where
        Fut: Future<Output = DbResult<T>>,
    {
        if !self.is_instrumented() {
            return run.await;
        }

        let mut ctx = QueryContext::new(sql, param_count);
        ctx.tag = tag.map(str::to_string);
        self.before(&ctx)?;

        let start = Instant::now();
        let result = run.await;
        let duration = start.elapsed();

        let outcome = match &result {
            Ok(value) => outcome_of(value),
            Err(e) => QueryOutcome::error(e.to_string()),
        };
        self.after(&ctx, duration, &outcome);
        result
    }
}

fn rows_outcome(rows: &Vec<Row>) -> QueryOutcome {
    QueryOutcome::Rows(rows.len())
}

fn opt_outcome(row: &Option<Row>) -> QueryOutcome {
    QueryOutcome::OptionalRow(row.is_some())
}

fn affected_outcome(n: &u64) -> QueryOutcome {
    QueryOutcome::Affected(*n)
}

impl<C: GenericClient> GenericClient for InstrumentedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        let run = self.client.query(sql, params);
        self.instrument(sql, params.len(), None, run, rows_outcome)
            .await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Vec<Row>> {
        let run = self.client.query_tagged(tag, sql, params);
        self.instrument(sql, params.len(), Some(tag), run, rows_outcome)
            .await
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Option<Row>> {
        let run = self.client.query_opt(sql, params);
        self.instrument(sql, params.len(), None, run, opt_outcome)
            .await
    }

    async fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Option<Row>> {
        let run = self.client.query_opt_tagged(tag, sql, params);
        self.instrument(sql, params.len(), Some(tag), run, opt_outcome)
            .await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        let run = self.client.execute(sql, params);
        self.instrument(sql, params.len(), None, run, affected_outcome)
            .await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<u64> {
        let run = self.client.execute_tagged(tag, sql, params);
        self.instrument(sql, params.len(), Some(tag), run, affected_outcome)
            .await
    }
}

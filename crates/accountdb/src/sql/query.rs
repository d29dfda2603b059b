use super::placeholder::{expand_placeholder_group, highest_placeholder};
use crate::error::{DbError, DbResult};
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A SQL string with pre-numbered placeholders (`$1, $2, ...`) plus bound parameters.
///
/// Use this when you already have a complete SQL string and just want to bind values.
#[must_use]
pub struct Query {
    sql: String,
    params: Vec<Arc<dyn ToSql + Sync + Send>>,
    tag: Option<String>,
}

impl Query {
    /// Create a new pre-numbered query.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            tag: None,
        }
    }

    /// Associate a tag for monitoring/observability.
    ///
    /// # Example
    /// ```ignore
    /// let row = accountdb::query("SELECT pk, id FROM account WHERE id = $1")
    ///     .tag("GetAccount")
    ///     .bind("acct-1".to_string())
    ///     .fetch_opt(&client)
    ///     .await?;
    /// ```
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Bind a parameter value.
    ///
    /// This does not modify the SQL string; it only appends the value to the
    /// parameter list. The SQL string must already contain `$1, $2, ...`.
    pub fn bind<T>(mut self, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(Arc::new(value));
        self
    }

    /// Append a placeholder group for `values` and bind them.
    ///
    /// The group is numbered after the highest placeholder in the statement so far, so
    /// every placeholder the template already contains must be bound first.
    ///
    /// ```ignore
    /// accountdb::query("SELECT pk FROM account WHERE display_name = $1 AND id IN ")
    ///     .bind(name)
    ///     .bind_group("ids", ids)?   // "... IN ($2, $3, ...)"
    /// ```
    pub fn bind_group<T>(
        mut self,
        param: &'static str,
        values: impl IntoIterator<Item = T>,
    ) -> DbResult<Self>
    where
        T: ToSql + Sync + Send + 'static,
    {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Err(DbError::EmptyParamList { param });
        }

        let last = highest_placeholder(&self.sql);
        if last != self.params.len() {
            return Err(DbError::Validation(format!(
                "Query: {} params bound but statement uses up to ${last}",
                self.params.len()
            )));
        }

        let group = expand_placeholder_group(last + 1, values.len())?;
        self.sql.push_str(&group);
        for v in values {
            self.params.push(Arc::new(v));
        }
        Ok(self)
    }

    /// Access the SQL string.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    impl_query_exec! {
        prepare(self) {
            let sql: &str = &self.sql;
            let params = self.params_ref();
            let tag = self.tag.as_deref();
            (sql, params, tag)
        }
    }
}

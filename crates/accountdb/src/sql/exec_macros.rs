/// Generate the execution methods for a type that can provide
/// `(sql: String, params: Vec<&(dyn ToSql + Sync)>, tag: Option<&str>)`.
///
/// Usage:
/// ```ignore
/// impl_query_exec! {
///     prepare(self) {
///         self.validate()?;
///         let sql = self.to_sql();
///         let params = self.params_ref();
///         let tag = self.tag.as_deref();
///         (sql, params, tag)
///     }
/// }
/// ```
macro_rules! impl_query_exec {
    (prepare($this:ident) $prepare:block) => {

        /// Execute the statement and return all rows.
        pub async fn fetch_all(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::DbResult<Vec<tokio_postgres::Row>> {
            let (sql, params, tag) = $prepare;
            match tag {
                Some(tag) => conn.query_tagged(tag, &sql, &params).await,
                None => conn.query(&sql, &params).await,
            }
        }

        /// Execute the statement and return all rows mapped to `T`.
        pub async fn fetch_all_as<T: $crate::row::FromRow>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::DbResult<Vec<T>> {
            let rows = $this.fetch_all(conn).await?;
            rows.iter().map(T::from_row).collect()
        }

        /// Execute the statement and return the first row, if any.
        pub async fn fetch_opt(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::DbResult<Option<tokio_postgres::Row>> {
            let (sql, params, tag) = $prepare;
            match tag {
                Some(tag) => conn.query_opt_tagged(tag, &sql, &params).await,
                None => conn.query_opt(&sql, &params).await,
            }
        }

        /// Execute the statement and return at most one row mapped to `T`.
        pub async fn fetch_opt_as<T: $crate::row::FromRow>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::DbResult<Option<T>> {
            let row = $this.fetch_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }

        /// Execute the statement and return affected row count.
        pub async fn execute(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::DbResult<u64> {
            let (sql, params, tag) = $prepare;
            match tag {
                Some(tag) => conn.execute_tagged(tag, &sql, &params).await,
                None => conn.execute(&sql, &params).await,
            }
        }
    };
}

//! Connection pool utilities

use crate::config::DbConfig;
use crate::error::DbResult;
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a connection pool from a [`DbConfig`].
///
/// Uses `NoTls` and `pool_max_size` from the config. For production, prefer
/// [`create_pool_with_tls`] if your database requires TLS.
///
/// # Example
///
/// ```ignore
/// let pool = accountdb::create_pool(&DbConfig::from_env()?)?;
/// let client = pool.get().await?;
/// let accounts = accountdb::queries::account::list_accounts(&client).await?;
/// ```
pub fn create_pool(config: &DbConfig) -> DbResult<Pool> {
    create_pool_with_manager_config(config, NoTls, default_manager_config(), |builder| builder)
}

/// Create a connection pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &DbConfig, tls: T) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    create_pool_with_manager_config(config, tls, default_manager_config(), |b| b)
}

/// Create a connection pool with injected `deadpool_postgres::ManagerConfig` and `PoolBuilder`.
///
/// `configure_pool` runs after `max_size` has been set from the config, so it can
/// override it along with timeouts and the runtime.
pub fn create_pool_with_manager_config<T>(
    config: &DbConfig,
    tls: T,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config = config.pg_config()?;
    let mgr = Manager::from_config(pg_config, tls, manager_config);
    let pool = configure_pool(Pool::builder(mgr).max_size(config.pool_max_size)).build()?;
    Ok(pool)
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}

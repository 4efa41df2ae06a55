use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::model::error::DatabaseResult;

/// Shared Postgres pool. Clones hand out the same pool.
#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    /// Lazily connects; the first query opens the first connection.
    pub fn connect(database_uri: &str, max_connections: u32) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_uri)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wraps an already configured pool, e.g. a per-test database.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

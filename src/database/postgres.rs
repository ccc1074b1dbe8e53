use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::catalog::QueryCatalog;
use crate::database::executor::{DatabaseError, QueryExecutor, QueryResult, SqlParam};
use crate::database::record::pg_row_to_record;

/// Query executor backed by a PostgreSQL pool and the stored-query catalog
pub struct PgExecutor {
    pool: PgPool,
    catalog: Arc<QueryCatalog>,
}

impl PgExecutor {
    pub fn new(pool: PgPool, catalog: QueryCatalog) -> Self {
        Self {
            pool,
            catalog: Arc::new(catalog),
        }
    }

    /// Build the pool from config. Connections are opened lazily on first use.
    pub fn connect(config: &DatabaseConfig, catalog: QueryCatalog) -> Result<Self, DatabaseError> {
        let url = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(url)?;

        info!(
            "Created database pool for {}{} ({} queries in catalog)",
            parsed.host_str().unwrap_or("localhost"),
            parsed.path(),
            catalog.len()
        );
        Ok(Self::new(pool, catalog))
    }

    pub fn catalog(&self) -> &QueryCatalog {
        &self.catalog
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn execute(&self, query_id: &str, params: Vec<SqlParam>) -> Result<QueryResult, DatabaseError> {
        let sql = self
            .catalog
            .get(query_id)
            .ok_or_else(|| DatabaseError::UnknownQuery(query_id.to_string()))?;

        let started = Instant::now();
        let mut query = sqlx::query(sql);
        for param in params.iter() {
            query = bind_param(query, param);
        }

        // stored queries are SELECTs or end in RETURNING
        let rows = query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(pg_row_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        let row_count = rows.len() as u64;
        debug!(
            query_id,
            row_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "executed stored query"
        );
        Ok(QueryResult { rows, row_count })
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match param {
        // Stored queries cast every placeholder explicitly, so an untyped text NULL is safe
        SqlParam::Keep | SqlParam::Value(Value::Null) => {
            let none: Option<String> = None;
            q.bind(none)
        }
        SqlParam::Value(Value::Bool(b)) => q.bind(*b),
        SqlParam::Value(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; anything this large is not a valid id or count
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        SqlParam::Value(Value::String(s)) => q.bind(s.as_str()),
        SqlParam::Value(v @ (Value::Array(_) | Value::Object(_))) => q.bind(v.clone()), // JSONB
    }
}

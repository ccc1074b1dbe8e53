use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::record::{camelize_keys, Record};

/// SQLSTATE raised by PostgreSQL on a foreign-key violation
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by a query executor
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    /// Statement rejected by the store. `code` is the vendor code (SQLSTATE) when present.
    #[error("Query error: {message}")]
    Query { code: Option<String>, message: String },

    #[error("Unexpected row shape: {0}")]
    RowShape(String),

    #[error("Failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl DatabaseError {
    pub fn query(code: Option<&str>, message: impl Into<String>) -> Self {
        DatabaseError::Query {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Vendor error code, compared by value rather than message text
    pub fn code(&self) -> Option<&str> {
        match self {
            DatabaseError::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.code() == Some(FOREIGN_KEY_VIOLATION)
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DatabaseError::Query {
                code: db_err.code().map(|c| c.into_owned()),
                message: db_err.message().to_string(),
            },
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// One positional parameter of a stored query.
///
/// `Keep` is the "leave unchanged" sentinel produced by the partial-update
/// builder. It is bound as SQL `NULL`, which stored queries fold away with
/// `COALESCE($n, column)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Keep,
    Value(Value),
}

impl SqlParam {
    pub fn value(v: impl Into<Value>) -> Self {
        SqlParam::Value(v.into())
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, SqlParam::Keep)
    }
}

/// Rows and affected-row count of one executed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Record>,
    pub row_count: u64,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from raw store rows, converting column names to camelCase.
    pub fn from_store_rows(rows: Vec<Map<String, Value>>) -> Self {
        let rows: Vec<Record> = rows.into_iter().map(camelize_keys).collect();
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }

    /// Mutations signal success only through the affected-row count
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.rows.is_empty()
    }

    pub fn first<T: DeserializeOwned>(&self) -> Result<Option<T>, DatabaseError> {
        if self.row_count == 0 {
            return Ok(None);
        }
        match self.rows.first() {
            Some(row) => Ok(Some(serde_json::from_value(Value::Object(row.clone()))?)),
            None => Ok(None),
        }
    }

    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DatabaseError> {
        self.rows
            .iter()
            .map(|row| serde_json::from_value(Value::Object(row.clone())).map_err(DatabaseError::from))
            .collect()
    }
}

/// Data-access seam: run a stored query by id with positional parameters.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query_id: &str, params: Vec<SqlParam>) -> Result<QueryResult, DatabaseError>;

    /// Connectivity probe used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}

//! In-memory query executor for tests.
//!
//! Responses are scripted per query id and consumed in order; every call is
//! recorded so tests can assert which statements ran and with what
//! parameters. A query with no scripted response returns an empty result.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::{DatabaseError, QueryExecutor, QueryResult, SqlParam};

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    pub query_id: String,
    pub params: Vec<SqlParam>,
}

#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, VecDeque<Result<QueryResult, DatabaseError>>>>,
    calls: Mutex<Vec<ExecutedQuery>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue store rows (snake_case, as the store returns them) for `query_id`
    pub fn respond(&self, query_id: &str, rows: Vec<Value>) -> &Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.push(query_id, Ok(QueryResult::from_store_rows(rows)))
    }

    /// Queue a zero-row result for `query_id`
    pub fn respond_empty(&self, query_id: &str) -> &Self {
        self.push(query_id, Ok(QueryResult::empty()))
    }

    /// Queue a store error for `query_id`
    pub fn fail(&self, query_id: &str, error: DatabaseError) -> &Self {
        self.push(query_id, Err(error))
    }

    fn push(&self, query_id: &str, response: Result<QueryResult, DatabaseError>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(query_id.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<ExecutedQuery> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.query_id).collect()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, query_id: &str, params: Vec<SqlParam>) -> Result<QueryResult, DatabaseError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ExecutedQuery {
                query_id: query_id.to_string(),
                params,
            });

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(query_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(QueryResult::empty()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let db = ScriptedExecutor::new();
        db.respond("q", vec![json!({"first_name": "a"})]).respond_empty("q");

        let first = db.execute("q", vec![SqlParam::value(1)]).await.unwrap();
        assert_eq!(first.rows[0].get("firstName"), Some(&json!("a")));

        let second = db.execute("q", vec![]).await.unwrap();
        assert!(second.is_empty());

        let unscripted = db.execute("other", vec![]).await.unwrap();
        assert!(unscripted.is_empty());

        assert_eq!(db.call_ids(), vec!["q", "q", "other"]);
        assert_eq!(db.calls()[0].params, vec![SqlParam::value(1)]);
    }
}

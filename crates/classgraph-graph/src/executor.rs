//! The query execution seam.

use std::future::Future;

use neo4rs::Query;

use crate::client::{Connection, GraphError};
use crate::result::QueryResult;

/// Anything that can run one query against a named (or default) database.
///
/// [`Connection`] is the real implementation; callers that only need to
/// issue statements take `&impl QueryExecutor` so they can run against a
/// fake in tests.
pub trait QueryExecutor: Sync {
    /// Run `query` and collect all records, or report why it failed.
    fn execute(
        &self,
        query: Query,
        database: Option<&str>,
    ) -> impl Future<Output = Result<QueryResult, GraphError>> + Send;

    /// Run `query`, masking any failure as an empty result.
    ///
    /// Callers cannot tell "returned nothing" from "failed" through this
    /// method. The failure is still logged by `execute`.
    fn execute_lenient(
        &self,
        query: Query,
        database: Option<&str>,
    ) -> impl Future<Output = QueryResult> + Send {
        async move {
            match self.execute(query, database).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::debug!(error = %e, "Masking query failure as empty result");
                    QueryResult::default()
                }
            }
        }
    }
}

impl QueryExecutor for Connection {
    async fn execute(
        &self,
        query: Query,
        database: Option<&str>,
    ) -> Result<QueryResult, GraphError> {
        Connection::execute(self, query, database).await
    }
}

//! Per-query sessions.

use neo4rs::{Graph, Query, Txn};

use crate::result::QueryResult;

/// A short-lived execution context bound to one database.
///
/// Opened for a single query and consumed by [`Session::collect`]. The query
/// runs in an explicit transaction on one dedicated pooled connection, which
/// goes back to the driver when the transaction handle drops, before
/// `collect` returns on every path.
///
/// Unlike `Graph::execute`, nothing here is retried: a refused connection or
/// a failed query surfaces on the first attempt.
pub struct Session<'g> {
    graph: &'g Graph,
    database: Option<&'g str>,
}

impl<'g> Session<'g> {
    pub fn open(graph: &'g Graph, database: Option<&'g str>) -> Self {
        tracing::debug!(database = database.unwrap_or("<default>"), "Session opened");
        Self { graph, database }
    }

    /// Run the query and drain the stream into memory.
    ///
    /// Commits once every row is read; rolls back if running or reading fails.
    pub async fn collect(self, query: Query) -> Result<QueryResult, neo4rs::Error> {
        let mut txn = match self.database {
            Some(db) => self.graph.start_txn_on(db).await?,
            None => self.graph.start_txn().await?,
        };

        match drain(&mut txn, query).await {
            Ok(rows) => {
                txn.commit().await?;
                Ok(QueryResult::new(rows))
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::debug!(error = %rollback, "Rollback after failed query also failed");
                }
                Err(e)
            }
        }
    }
}

async fn drain(txn: &mut Txn, query: Query) -> Result<Vec<neo4rs::Row>, neo4rs::Error> {
    let mut stream = txn.execute(query).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        tracing::debug!(
            database = self.database.unwrap_or("<default>"),
            "Session released"
        );
    }
}

//! Neo4j connection management.

use neo4rs::{query, ConfigBuilder, Graph, Query};

use classgraph_core::Neo4jSettings;

use crate::result::QueryResult;
use crate::session::Session;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Connection already closed")]
    Closed,
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database for queries that name none. `None` leaves it to the server.
    pub database: Option<String>,
    pub max_connections: u32,
    pub fetch_size: usize,
    pub verify_connectivity: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GatewayConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
            verify_connectivity: settings.verify_connectivity,
        }
    }
}

/// An open handle to a Neo4j endpoint.
///
/// Lifecycle is open (after [`Connection::connect`]) then closed (after
/// [`Connection::close`]), never back. Not `Clone`: one owner drives it, and
/// sharing it across tasks is the owner's business.
pub struct Connection {
    graph: Option<Graph>,
    uri: String,
}

impl Connection {
    /// Connect to Neo4j with the given configuration.
    ///
    /// Fails if the driver rejects the configuration, or, with
    /// `verify_connectivity` set, if a probe query cannot run.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        if config.verify_connectivity {
            Session::open(&graph, None)
                .collect(query("RETURN 1"))
                .await
                .map_err(|e| GraphError::Connection(e.to_string()))?;
        }

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph: Some(graph),
            uri: config.uri.clone(),
        })
    }

    /// Whether the driver handle is still held.
    pub fn is_open(&self) -> bool {
        self.graph.is_some()
    }

    /// Run one query in a fresh session and collect every record.
    ///
    /// `database` scopes the session; `None` uses the driver default. The
    /// query text is passed through untouched. Failures are logged and
    /// returned; the session is released either way.
    pub async fn execute(
        &self,
        query: Query,
        database: Option<&str>,
    ) -> Result<QueryResult, GraphError> {
        let graph = self.graph.as_ref().ok_or(GraphError::Closed)?;

        match Session::open(graph, database).collect(query).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(
                    uri = %self.uri,
                    database = database.unwrap_or("<default>"),
                    error = %e,
                    "Query failed"
                );
                Err(GraphError::Query(e))
            }
        }
    }

    /// Release the driver handle. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(graph) = self.graph.take() {
            drop(graph);
            tracing::info!(uri = %self.uri, "Neo4j connection closed");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("uri", &self.uri)
            .field("open", &self.is_open())
            .finish()
    }
}

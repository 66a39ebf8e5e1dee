//! classgraph-graph: the Neo4j session gateway.
//!
//! A [`Connection`] owns one driver handle. Every query runs in its own
//! short-lived [`session::Session`], all records are collected before the
//! call returns, and the session is released on every path.

pub mod client;
pub mod executor;
pub mod result;
pub mod session;

pub use client::{Connection, GatewayConfig, GraphError};
pub use executor::QueryExecutor;
pub use neo4rs::{query, Query, Row};
pub use result::QueryResult;

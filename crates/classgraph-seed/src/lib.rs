//! classgraph-seed: Seeds the classroom layout graph.
//!
//! The seed plan is a fixed list of Cypher statements that pull CSV files
//! into Neo4j with `LOAD CSV` and wire up the relationships between the
//! loaded nodes. Statements run one by one through the session gateway.

pub mod error;
pub mod plan;
pub mod report;
pub mod runner;

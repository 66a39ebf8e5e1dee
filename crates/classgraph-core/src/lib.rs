//! classgraph-core: Shared configuration and error handling for the classgraph tools.
//!
//! - Layered settings (file, environment, defaults) for the Neo4j gateway and the seeder
//! - The top-level error type

pub mod error;
pub mod settings;

pub use error::ClassgraphError;
pub use settings::{Neo4jSettings, SeedSettings, Settings};

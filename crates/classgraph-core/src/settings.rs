//! Configuration management for classgraph tools.
//!
//! Settings are loaded from (in priority order):
//! 1. Environment variables (`CLASSGRAPH__` prefix, `__` separator,
//!    e.g. `CLASSGRAPH__NEO4J__PASSWORD`)
//! 2. Config file (`classgraph.toml` by default, optional)
//! 3. Defaults

use serde::Deserialize;

use crate::error::ClassgraphError;

/// Default config file prefix (resolves to `classgraph.toml`).
pub const DEFAULT_FILE_PREFIX: &str = "classgraph";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CLASSGRAPH";

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub seed: SeedSettings,
}

/// Connection settings for the Neo4j endpoint (`[neo4j]` section).
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    /// Bolt endpoint, scheme + host + port.
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database used when a query names none. `None` means the server default.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Run a probe query at connect time so bad endpoints fail early.
    #[serde(default = "default_true")]
    pub verify_connectivity: bool,

    /// Collapse failed queries into empty results instead of returning errors.
    #[serde(default)]
    pub swallow_errors: bool,
}

/// Settings for the classroom seeder (`[seed]` section).
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    /// Database every seed statement runs against.
    #[serde(default = "default_seed_database")]
    pub database: String,

    /// Base URL the CSV files are served from, without trailing slash.
    #[serde(default = "default_csv_base_url")]
    pub csv_base_url: String,

    /// Abort at the first failing step.
    #[serde(default)]
    pub strict: bool,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_seed_database() -> String {
    "graphdb".to_string()
}

fn default_csv_base_url() -> String {
    "https://raw.githubusercontent.com/wassimsmr/PL_AI/main".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            verify_connectivity: true,
            swallow_errors: false,
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            database: default_seed_database(),
            csv_base_url: default_csv_base_url(),
            strict: false,
        }
    }
}

impl Settings {
    /// Load settings from `<file_prefix>.toml` (if present) and the process environment.
    pub fn load(file_prefix: &str) -> Result<Self, ClassgraphError> {
        Self::load_with_env(file_prefix, environment())
    }

    /// Load settings with an explicit environment source.
    pub fn load_with_env(
        file_prefix: &str,
        env: config::Environment,
    ) -> Result<Self, ClassgraphError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(env)
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            file_prefix,
            uri = %settings.neo4j.uri,
            seed_database = %settings.seed.database,
            "Settings loaded"
        );
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ClassgraphError> {
        if self.neo4j.max_connections == 0 {
            return Err(ClassgraphError::InvalidSetting {
                key: "neo4j.max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.seed.database.trim().is_empty() {
            return Err(ClassgraphError::InvalidSetting {
                key: "seed.database".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// The `CLASSGRAPH__*` environment source.
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_env() -> config::Environment {
        environment().source(Some(config::Map::new()))
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("missing");

        let settings = Settings::load_with_env(prefix.to_str().unwrap(), empty_env()).unwrap();
        assert_eq!(settings.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(settings.neo4j.user, "neo4j");
        assert_eq!(settings.neo4j.max_connections, 16);
        assert!(settings.neo4j.verify_connectivity);
        assert!(!settings.neo4j.swallow_errors);
        assert_eq!(settings.neo4j.database, None);
        assert_eq!(settings.seed.database, "graphdb");
        assert!(!settings.seed.strict);
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("classgraph.toml"),
            r#"
[neo4j]
uri = "bolt://db.internal:7687"
user = "loader"
password = "secret"
database = "school"
swallow_errors = true

[seed]
database = "school"
strict = true
"#,
        )
        .unwrap();

        let prefix = dir.path().join("classgraph");
        let settings = Settings::load_with_env(prefix.to_str().unwrap(), empty_env()).unwrap();
        assert_eq!(settings.neo4j.uri, "bolt://db.internal:7687");
        assert_eq!(settings.neo4j.user, "loader");
        assert_eq!(settings.neo4j.password, "secret");
        assert_eq!(settings.neo4j.database.as_deref(), Some("school"));
        assert!(settings.neo4j.swallow_errors);
        assert_eq!(settings.neo4j.fetch_size, 256);
        assert_eq!(settings.seed.database, "school");
        assert!(settings.seed.strict);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("classgraph.toml"),
            "[neo4j]\nuser = \"from-file\"\n",
        )
        .unwrap();

        let mut vars = config::Map::new();
        vars.insert("CLASSGRAPH__NEO4J__USER".to_string(), "from-env".to_string());
        vars.insert("CLASSGRAPH__SEED__STRICT".to_string(), "true".to_string());
        let env = environment().source(Some(vars));

        let prefix = dir.path().join("classgraph");
        let settings = Settings::load_with_env(prefix.to_str().unwrap(), env).unwrap();
        assert_eq!(settings.neo4j.user, "from-env");
        assert!(settings.seed.strict);
    }

    #[test]
    fn test_rejects_zero_pool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("classgraph.toml"),
            "[neo4j]\nmax_connections = 0\n",
        )
        .unwrap();

        let prefix = dir.path().join("classgraph");
        let err = Settings::load_with_env(prefix.to_str().unwrap(), empty_env()).unwrap_err();
        assert!(matches!(err, ClassgraphError::InvalidSetting { ref key, .. } if key == "neo4j.max_connections"));
    }
}

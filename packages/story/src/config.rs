use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct StoryConfig {
    /// Regenerations allowed after a failed post-scan.
    pub max_safety_retries: u32,
    /// Replacement blocklist file; the built-in one is used when unset.
    pub blocklist_path: Option<PathBuf>,
}

impl StoryConfig {
    pub fn from_env() -> Self {
        let max_safety_retries = env_or_default("STORY_MAX_SAFETY_RETRIES", 1);

        let blocklist_path = std::env::var("SAFETY_BLOCKLIST_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            max_safety_retries,
            blocklist_path,
        }
    }

    pub fn with_max_safety_retries(mut self, max_safety_retries: u32) -> Self {
        self.max_safety_retries = max_safety_retries;
        self
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            max_safety_retries: 1,
            blocklist_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL URL; stories are kept in memory when unset.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let max_connections = env_or_default("DATABASE_MAX_CONNECTIONS", 5);

        Self {
            database_url,
            max_connections,
        }
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Some(database_url.into()),
            max_connections: 5,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Read `name` from the environment, falling back to `default` when it is
/// unset or does not parse. Unparseable values are logged.
pub(crate) fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_or_default(name, std::env::var(name).ok().as_deref(), default)
}

fn parse_or_default<T>(name: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(setting = name, value = %raw, error = %e, "invalid value, using {default}");
            default
        }
    }
}

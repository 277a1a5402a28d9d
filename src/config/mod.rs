pub mod logging;

use std::time::Duration;
use thiserror::Error;

/// Default token lifetime when EXPIRES_IN is not set
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

const DEFAULT_DATABASE_URL: &str = "sqlite://directory.db?mode=rwc";

/// Trait for providing environment variable access
///
/// Allows tests to inject variable values without mutating the shared
/// process environment from parallel test threads.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production provider that reads from the system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Immutable application configuration, loaded once at startup
///
/// All knobs live here and are passed into constructors; nothing reads
/// the environment at request time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Token signing secret (SECRET_KEY, required)
    pub secret_key: String,

    /// Token lifetime (EXPIRES_IN, default 15 minutes)
    pub token_ttl: Duration,

    /// Password hashing cost factor (SALT_ROUNDS, required positive integer)
    pub salt_rounds: u32,

    /// Database connection string (DATABASE_URL)
    pub database_url: String,
}

impl AppConfig {
    /// Load and validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when SECRET_KEY is absent, SALT_ROUNDS is
    /// absent or not a positive integer, or EXPIRES_IN fails to parse.
    /// Callers treat any of these as a fatal startup error.
    pub fn load(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let secret_key = env
            .get_var("SECRET_KEY")
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let token_ttl = match env.get_var("EXPIRES_IN") {
            Some(value) => parse_duration(&value).map_err(|message| ConfigError::Invalid {
                name: "EXPIRES_IN",
                message,
            })?,
            None => DEFAULT_TOKEN_TTL,
        };

        let salt_rounds_raw = env
            .get_var("SALT_ROUNDS")
            .ok_or(ConfigError::Missing("SALT_ROUNDS"))?;
        let salt_rounds: u32 =
            salt_rounds_raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid {
                    name: "SALT_ROUNDS",
                    message: format!("expected a positive integer, got '{}': {}", salt_rounds_raw, e),
                })?;
        if salt_rounds == 0 {
            return Err(ConfigError::Invalid {
                name: "SALT_ROUNDS",
                message: "cost factor must be at least 1".to_string(),
            });
        }

        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            secret_key,
            token_ttl,
            salt_rounds,
            database_url,
        })
    }
}

/// Parse a duration from human-readable formats
///
/// Supports "900s", "15m", "2h", "1d" (and spelled-out units); a plain
/// number is taken as seconds.
fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim().to_lowercase();

    let (number_str, unit) = if let Some(pos) = value.find(|c: char| c.is_alphabetic()) {
        (&value[..pos], &value[pos..])
    } else {
        // No unit, assume seconds
        (value.as_str(), "s")
    };

    let number = number_str
        .parse::<u64>()
        .map_err(|e| format!("expected number in duration '{}': {}", value, e))?;

    let seconds = match unit {
        "s" | "sec" | "second" | "seconds" => number,
        "m" | "min" | "minute" | "minutes" => number * 60,
        "h" | "hr" | "hour" | "hours" => number * 60 * 60,
        "d" | "day" | "days" => number * 24 * 60 * 60,
        _ => {
            return Err(format!(
                "unknown duration unit '{}' in '{}'. Supported: s, m, h, d",
                unit, value
            ))
        }
    };

    Ok(Duration::from_secs(seconds))
}

/// Test provider with fixed variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self {
            vars: std::collections::HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_env() -> MockEnvironment {
        MockEnvironment::empty()
            .with_var("SECRET_KEY", "test-secret-key-minimum-32-characters-long")
            .with_var("SALT_ROUNDS", "2")
    }

    #[test]
    fn test_load_with_minimal_valid_env() {
        let config = AppConfig::load(&valid_env()).expect("config should load");

        assert_eq!(
            config.secret_key,
            "test-secret-key-minimum-32-characters-long"
        );
        assert_eq!(config.salt_rounds, 2);
        assert_eq!(config.token_ttl, Duration::from_secs(900));
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_load_fails_without_secret_key() {
        let env = MockEnvironment::empty().with_var("SALT_ROUNDS", "2");

        let result = AppConfig::load(&env);

        assert!(matches!(result, Err(ConfigError::Missing("SECRET_KEY"))));
    }

    #[test]
    fn test_load_fails_without_salt_rounds() {
        let env = MockEnvironment::empty().with_var("SECRET_KEY", "secret");

        let result = AppConfig::load(&env);

        assert!(matches!(result, Err(ConfigError::Missing("SALT_ROUNDS"))));
    }

    #[test]
    fn test_load_fails_with_non_numeric_salt_rounds() {
        let env = valid_env().with_var("SALT_ROUNDS", "lots");

        let result = AppConfig::load(&env);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "SALT_ROUNDS",
                ..
            })
        ));
    }

    #[test]
    fn test_load_fails_with_zero_salt_rounds() {
        let env = valid_env().with_var("SALT_ROUNDS", "0");

        let result = AppConfig::load(&env);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "SALT_ROUNDS",
                ..
            })
        ));
    }

    #[test]
    fn test_expires_in_parses_units() {
        let config = AppConfig::load(&valid_env().with_var("EXPIRES_IN", "2h"))
            .expect("config should load");
        assert_eq!(config.token_ttl, Duration::from_secs(2 * 60 * 60));

        let config = AppConfig::load(&valid_env().with_var("EXPIRES_IN", "90"))
            .expect("config should load");
        assert_eq!(config.token_ttl, Duration::from_secs(90));

        let config = AppConfig::load(&valid_env().with_var("EXPIRES_IN", "30min"))
            .expect("config should load");
        assert_eq!(config.token_ttl, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_expires_in_rejects_unknown_unit() {
        let result = AppConfig::load(&valid_env().with_var("EXPIRES_IN", "3fortnights"));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "EXPIRES_IN",
                ..
            })
        ));
    }
}

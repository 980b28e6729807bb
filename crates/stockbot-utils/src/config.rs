//! Environment variable helpers shared by configuration loaders

use std::str::FromStr;
use thiserror::Error;

/// Failure while reading an environment variable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// Variable is unset or empty
    #[error("{0} not set")]
    Missing(String),

    /// Variable is set but does not parse
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read a variable that must be present and non-empty
pub fn env_required(key: &str) -> Result<String, EnvError> {
    lookup(key).ok_or_else(|| EnvError::Missing(key.to_string()))
}

/// Read a variable, falling back to `default` when unset or empty
pub fn env_or(key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Read and parse an optional variable
pub fn env_parse<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| EnvError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_env_required_missing() {
        let err = env_required("STOCKBOT_UTILS_TEST_MISSING").unwrap_err();
        assert_eq!(err.to_string(), "STOCKBOT_UTILS_TEST_MISSING not set");
    }

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("STOCKBOT_UTILS_TEST_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn test_env_parse_values() {
        unsafe {
            std::env::set_var("STOCKBOT_UTILS_TEST_PORT", "8080");
            std::env::set_var("STOCKBOT_UTILS_TEST_BAD_PORT", "eighty");
        }

        assert_eq!(env_parse::<u16>("STOCKBOT_UTILS_TEST_PORT"), Ok(Some(8080)));
        assert_eq!(env_parse::<u16>("STOCKBOT_UTILS_TEST_NOPE"), Ok(None));
        assert!(matches!(
            env_parse::<u16>("STOCKBOT_UTILS_TEST_BAD_PORT"),
            Err(EnvError::Invalid { .. })
        ));

        unsafe {
            std::env::remove_var("STOCKBOT_UTILS_TEST_PORT");
            std::env::remove_var("STOCKBOT_UTILS_TEST_BAD_PORT");
        }
    }
}

// Process configuration, read once at startup

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Immutable configuration shared by the whole process
///
/// `access_token_secret` signs every token this process issues; restarting
/// with a different secret invalidates all outstanding tokens.
#[derive(Clone)]
pub struct Config {
    pub access_token_secret: String,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token_secret", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let access_token_secret =
            non_empty("ACCESS_TOKEN_SECRET").ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let host = non_empty("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            access_token_secret,
            host,
            port,
            database_url: non_empty("DATABASE_URL"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.access_token_secret, "s3cret");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_secret_is_required() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("ACCESS_TOKEN_SECRET")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("ACCESS_TOKEN_SECRET")
        );
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = Config::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("DATABASE_URL", "postgresql://ghost:boo@db/ghosts"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert!(config.database_url.is_some());

        let err = Config::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "s3cret"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "s3cret")])).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}

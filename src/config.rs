//! Session configuration module
//!
//! This module builds the immutable session configuration from the
//! process environment: server URL, access token and debug flag.

use std::env;
use thiserror::Error;

/// Environment variable holding the server base URL
pub const URL_VAR: &str = "JELLYCTL_URL";

/// Environment variable holding the access token
pub const TOKEN_VAR: &str = "JELLYCTL_TOKEN";

/// Server used when `JELLYCTL_URL` is absent or blank
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8096";

/// Errors that can occur while building the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mandatory token variable is absent or blank
    #[error("{} environment variable not set", TOKEN_VAR)]
    MissingToken,
}

/// Immutable session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the catalog server, without trailing slash
    pub server_url: String,
    /// Access token sent with every request
    pub token: String,
    /// Enables verbose request/response logging
    pub debug: bool,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env(debug: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok(), debug)
    }

    /// Builds the configuration from an arbitrary variable lookup
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of the named variable, if set
    /// * `debug` - Whether verbose transport logging is enabled
    ///
    /// # Examples
    ///
    /// ```
    /// use tvdb_janitor::Config;
    ///
    /// let config = Config::from_lookup(
    ///     |name| (name == "JELLYCTL_TOKEN").then(|| "abc".to_string()),
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(config.server_url, "http://127.0.0.1:8096");
    /// ```
    pub fn from_lookup<F>(lookup: F, debug: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup(URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let token = lookup(TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            server_url: server_url.trim().trim_end_matches('/').to_string(),
            token,
            debug,
        })
    }

    /// Value of the `Authorization` header for every request
    pub fn authorization_header(&self) -> String {
        format!("MediaBrowser Token=\"{}\"", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_url_when_absent_or_blank() {
        let config = Config::from_lookup(lookup_from(&[(TOKEN_VAR, "abc")]), false).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);

        let config =
            Config::from_lookup(lookup_from(&[(URL_VAR, "   "), (TOKEN_VAR, "abc")]), false)
                .unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_url_trailing_slash_is_stripped() {
        let config = Config::from_lookup(
            lookup_from(&[(URL_VAR, "https://jelly.example.com/"), (TOKEN_VAR, "abc")]),
            true,
        )
        .unwrap();
        assert_eq!(config.server_url, "https://jelly.example.com");
        assert!(config.debug);
    }

    #[test]
    fn test_missing_or_blank_token() {
        let result = Config::from_lookup(lookup_from(&[]), false);
        assert!(matches!(result, Err(ConfigError::MissingToken)));

        let result = Config::from_lookup(lookup_from(&[(TOKEN_VAR, " \t")]), false);
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_authorization_header() {
        let config = Config::from_lookup(lookup_from(&[(TOKEN_VAR, "abc123")]), false).unwrap();
        assert_eq!(
            config.authorization_header(),
            "MediaBrowser Token=\"abc123\""
        );
    }
}

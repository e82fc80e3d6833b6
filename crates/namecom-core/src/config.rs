//! Provider-level configuration
//!
//! Credentials are sourced from explicit configuration first and fall back to
//! the `NAMECOM_USER` / `NAMECOM_TOKEN` environment variables.

use serde::Deserialize;

/// Environment variable holding the API username
pub const USERNAME_ENV: &str = "NAMECOM_USER";

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "NAMECOM_TOKEN";

/// Production API endpoint
pub const PRODUCTION_BASE_URL: &str = "https://api.name.com";

/// Test (sandbox) API endpoint
pub const TEST_BASE_URL: &str = "https://api.dev.name.com";

/// name.com provider configuration
///
/// Only deserializable, so the token is never written back out.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// name.com API username
    #[serde(default)]
    pub username: String,

    /// name.com API token
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub token: String,

    /// Use the name.com test API instead of production
    #[serde(default)]
    pub test: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("username", &self.username)
            .field("token", &"<REDACTED>")
            .field("test", &self.test)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a new configuration from explicit credentials
    pub fn new(username: impl Into<String>, token: impl Into<String>, test: bool) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            test,
        }
    }

    /// Fill empty credentials from the process environment
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(|key| std::env::var(key).ok())
    }

    /// Fill empty credentials from the given lookup
    ///
    /// Explicitly configured values always win over the lookup.
    pub fn with_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.username.is_empty()
            && let Some(username) = lookup(USERNAME_ENV)
        {
            self.username = username;
        }
        if self.token.is_empty()
            && let Some(token) = lookup(TOKEN_ENV)
        {
            self.token = token;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.username.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "name.com API username is required (set it explicitly or via {})",
                USERNAME_ENV
            )));
        }
        if self.token.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "name.com API token is required (set it explicitly or via {})",
                TOKEN_ENV
            )));
        }
        Ok(())
    }

    /// API endpoint selected by the `test` flag
    pub fn base_url(&self) -> &'static str {
        if self.test {
            TEST_BASE_URL
        } else {
            PRODUCTION_BASE_URL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_env_fallback_fills_empty_fields() {
        let config = ProviderConfig::default()
            .with_fallback(env(&[(USERNAME_ENV, "alice"), (TOKEN_ENV, "s3cret")]));

        assert_eq!(config.username, "alice");
        assert_eq!(config.token, "s3cret");
        assert!(!config.test);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_values_win() {
        let config = ProviderConfig::new("bob", "explicit", true)
            .with_fallback(env(&[(USERNAME_ENV, "alice"), (TOKEN_ENV, "s3cret")]));

        assert_eq!(config.username, "bob");
        assert_eq!(config.token, "explicit");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let config = ProviderConfig::default().with_fallback(env(&[(USERNAME_ENV, "alice")]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV));

        assert!(ProviderConfig::new("", "token", false).validate().is_err());
    }

    #[test]
    fn test_base_url_selection() {
        assert_eq!(ProviderConfig::new("u", "t", false).base_url(), PRODUCTION_BASE_URL);
        assert_eq!(ProviderConfig::new("u", "t", true).base_url(), TEST_BASE_URL);
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let config = ProviderConfig::new("alice", "secret_token_12345", false);
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("alice"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(config.username, "alice");
        assert!(config.token.is_empty());
        assert!(!config.test);
    }
}

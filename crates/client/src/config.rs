//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TECKADM_DATA_FILE` - Local state file (default: teckadm-data.json)
//! - `TECKADM_DEFAULT_CURRENCY` - Currency of new quotes, `MXN` or `USD`
//!   (default: MXN)
//! - `TECKADM_EMAIL` / `TECKADM_PASSWORD` - Account to sign in with. Both or
//!   neither must be set.

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use teckadm_core::{CurrencyCode, Email};

const DEFAULT_DATA_FILE: &str = "teckadm-data.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Where the local backend keeps accounts and documents
    pub data_file: PathBuf,
    /// Currency a new quote starts in
    pub default_currency: CurrencyCode,
    /// Account to sign in with, if configured
    pub credentials: Option<Credentials>,
}

/// Sign-in credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if only one of
    /// the credential variables is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = PathBuf::from(get_env_or_default(
            &lookup,
            "TECKADM_DATA_FILE",
            DEFAULT_DATA_FILE,
        ));
        let default_currency = get_env_or_default(&lookup, "TECKADM_DEFAULT_CURRENCY", "MXN")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("TECKADM_DEFAULT_CURRENCY".to_string(), e))?;
        let credentials = Credentials::from_lookup(&lookup)?;

        Ok(Self {
            data_file,
            default_currency,
            credentials,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            default_currency: CurrencyCode::default(),
            credentials: None,
        }
    }
}

impl Credentials {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let email = get_optional_env(lookup, "TECKADM_EMAIL");
        let password = get_optional_env(lookup, "TECKADM_PASSWORD");

        match (email, password) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("TECKADM_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("TECKADM_EMAIL".to_string())),
            (Some(email), Some(password)) => {
                let email = Email::parse(&email).map_err(|e| {
                    ConfigError::InvalidEnvVar("TECKADM_EMAIL".to_string(), e.to_string())
                })?;
                Ok(Some(Self {
                    email,
                    password: SecretString::from(password),
                }))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable; empty values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_file, PathBuf::from("teckadm-data.json"));
        assert_eq!(config.default_currency, CurrencyCode::MXN);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_currency_parsed() {
        let config = load(&[("TECKADM_DEFAULT_CURRENCY", "usd")]).unwrap();
        assert_eq!(config.default_currency, CurrencyCode::USD);

        let err = load(&[("TECKADM_DEFAULT_CURRENCY", "EUR")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_credentials_need_both() {
        let err = load(&[("TECKADM_EMAIL", "ana@taller.mx")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "TECKADM_PASSWORD"));

        let config = load(&[
            ("TECKADM_EMAIL", "Ana@Taller.mx"),
            ("TECKADM_PASSWORD", "secreto1"),
        ])
        .unwrap();
        let credentials = config.credentials.unwrap();
        assert_eq!(credentials.email.as_str(), "ana@taller.mx");
        assert!(!format!("{credentials:?}").contains("secreto1"));
    }
}

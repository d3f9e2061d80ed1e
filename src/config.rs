//! Deployment configuration, read from the environment.
//!
//! Two settings are required to dispatch real notifications: the cloud
//! project to send through and the path to the service-account JSON key.
//! In-memory deployments (tests, local development without push) do not
//! need either.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::notify::adapters::{fcm::FcmConfig, token::ServiceAccountKey};

/// Environment variable naming the cloud project for push sends.
pub const ENV_PROJECT_ID: &str = "RELAY_FCM_PROJECT_ID";

/// Environment variable with the path to the service-account JSON key.
pub const ENV_KEY_PATH: &str = "RELAY_SERVICE_ACCOUNT_KEY";

/// Errors reading or interpreting the deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or not valid unicode.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// The service-account key file could not be read or parsed.
    #[error("invalid service-account key: {0}")]
    InvalidKey(String),
}

/// Deployment configuration for the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    project_id: String,
    credentials_path: PathBuf,
}

impl RelayConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(project_id: impl Into<String>, credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            project_id: project_id.into(),
            credentials_path: credentials_path.into(),
        }
    }

    /// Reads the configuration from `RELAY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] naming the first variable that
    /// is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id =
            env::var(ENV_PROJECT_ID).map_err(|_| ConfigError::MissingVar(ENV_PROJECT_ID))?;
        let credentials_path =
            env::var(ENV_KEY_PATH).map_err(|_| ConfigError::MissingVar(ENV_KEY_PATH))?;
        Ok(Self::new(project_id, credentials_path))
    }

    /// Returns the cloud project id.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the service-account key file path.
    #[must_use]
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Builds the FCM adapter configuration.
    #[must_use]
    pub fn fcm(&self) -> FcmConfig {
        FcmConfig::new(self.project_id.clone())
    }

    /// Loads the service-account key from the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] if the file cannot be read or
    /// parsed.
    pub fn load_service_account_key(&self) -> Result<ServiceAccountKey, ConfigError> {
        ServiceAccountKey::from_file(&self.credentials_path)
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))
    }
}

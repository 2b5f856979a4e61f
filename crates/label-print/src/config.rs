//! Print service configuration.
//!
//! Settings come from a TOML file:
//!
//! ```toml
//! [service]
//! endpoint = "https://print.example.com/api/print"
//! api_user = "labels"
//! api_password = "secret"
//! timeout_secs = 10
//!
//! [batch]
//! batch_size = 12
//! test_rows = 12
//!
//! [preview]
//! base_url = "https://api.labelary.com/v1"
//! ```
//!
//! Credentials may be overridden from the environment so that they never
//! have to be written to disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PrintError, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "LABEL_PRINT_CONFIG";
pub const ENDPOINT_ENV: &str = "LABEL_PRINT_ENDPOINT";
pub const USER_ENV: &str = "LABEL_PRINT_USER";
pub const PASSWORD_ENV: &str = "LABEL_PRINT_PASSWORD";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BATCH_SIZE: usize = 12;
pub const DEFAULT_TEST_ROWS: usize = 12;
pub const DEFAULT_PREVIEW_URL: &str = "https://api.labelary.com/v1";

/// Connection settings for the network print service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintServiceConfig {
    pub endpoint: Option<String>,
    pub api_user: Option<String>,
    pub api_password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PrintServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_user: None,
            api_password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for PrintServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_user", &self.api_user)
            .field("api_password", &self.api_password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn required<'a>(value: Option<&'a String>, field: &'static str) -> Result<&'a str> {
    value
        .map(String::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(PrintError::MissingConfig { field })
}

impl PrintServiceConfig {
    /// Checks that every setting needed to send a job is present.
    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        self.api_user()?;
        self.api_password()?;
        if self.timeout_secs == 0 {
            return Err(PrintError::InvalidConfig {
                field: "timeout_secs",
                value: self.timeout_secs.to_string(),
            });
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Result<&str> {
        required(self.endpoint.as_ref(), "endpoint")
    }

    pub fn api_user(&self) -> Result<&str> {
        required(self.api_user.as_ref(), "api_user")
    }

    pub fn api_password(&self) -> Result<&str> {
        required(self.api_password.as_ref(), "api_password")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Batching defaults for tabular jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Labels concatenated into one dispatch.
    pub batch_size: usize,
    /// Rows printed by a test print before the remainder.
    pub test_rows: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            test_rows: DEFAULT_TEST_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PREVIEW_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub service: PrintServiceConfig,
    pub batch: BatchSettings,
    pub preview: PreviewSettings,
}

impl PrintConfig {
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| PrintError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|source| PrintError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded print configuration");
        Ok(config)
    }

    /// Loads from `explicit`, else from the file named by
    /// `LABEL_PRINT_CONFIG`, else defaults; then applies environment
    /// overrides.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Replaces service settings with non-blank values from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets = [
            (ENDPOINT_ENV, &mut self.service.endpoint),
            (USER_ENV, &mut self.service.api_user),
            (PASSWORD_ENV, &mut self.service.api_password),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(key, "print setting overridden from environment");
                *target = Some(value);
            }
        }
    }
}

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_core::Priority;

const CONFIG_FILE: &str = "taskdeck.toml";
const ENV_BASE_URL: &str = "TASKDECK_BACKEND_URL";

/// Top-level application configuration loaded from `taskdeck.toml`.
///
/// The file is searched in the working directory first and the user
/// configuration directory second; a missing file yields the defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Remote record API settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Quick-add defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Load configuration for the given working directory.
    ///
    /// `TASKDECK_BACKEND_URL` overrides the configured base URL when set.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed, or if
    /// the resulting configuration is invalid.
    pub fn load(workdir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_override(workdir, env::var(ENV_BASE_URL).ok())
    }

    fn load_with_override(workdir: impl AsRef<Path>, base_url: Option<String>) -> Result<Self> {
        let mut config = match Self::discover(workdir.as_ref()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_base_url_override(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    fn discover(workdir: &Path) -> Option<PathBuf> {
        let local = workdir.join(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        let user = dirs::config_dir()?.join("taskdeck").join(CONFIG_FILE);
        user.exists().then_some(user)
    }

    fn apply_base_url_override(&mut self, base_url: Option<String>) {
        let Some(value) = base_url else {
            return;
        };
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.backend.base_url = Some(trimmed.to_owned());
        }
    }

    fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            bail!("backend timeout must be positive");
        }
        if self.defaults.category.trim().is_empty() {
            bail!("default category name must not be empty");
        }
        Ok(())
    }
}

/// Remote record API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the record API.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_timeout_secs() -> u64 {
    10
}

/// Defaults applied to quick-added tasks when a field is not provided.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Name of the category used when none is given.
    #[serde(default = "default_category_name")]
    pub category: String,
    /// Priority used when none is given.
    #[serde(default)]
    pub priority: Priority,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            category: default_category_name(),
            priority: Priority::default(),
        }
    }
}

fn default_category_name() -> String {
    "personal".to_owned()
}

use crate::poller::{MIN_INTERVAL, NotFoundPolicy, PollSettings};
use isard_common::prelude::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the optional YAML file read on top of the built-in defaults.
///
pub const DEFAULT_CONFIG_FILE: &str = "isard.yaml";

/// Represents the provider's configuration.
///
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub defaults: Defaults,
}

impl ProviderConfig {
    /// Loads the configuration from an optional `.env`, an optional YAML file
    /// (`ISARD_CONFIG_FILE`, `isard.yaml` by default) and `ISARD__*`
    /// environment variables, in increasing priority.
    ///
    pub fn from_env() -> Result<Self> {
        accept_dotenv(dotenv::dotenv())?;

        let file =
            std::env::var("ISARD_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix("ISARD").separator("__"))
            .build()?
            .try_deserialize::<ProviderConfig>()?;
        config.validate()?;

        tracing::info!(
            target: "config",
            endpoint = %config.connection.endpoint,
            auth_method = ?config.connection.auth_method,
            "Configuration loaded."
        );

        Ok(config)
    }

    /// Rejects values the serde defaults cannot rule out.
    ///
    pub fn validate(&self) -> Result<()> {
        if self.connection.endpoint.trim().is_empty() {
            return Err(Error::InvalidInput("connection.endpoint must not be empty".to_owned()));
        }
        if self.poll.interval_ms == 0 {
            return Err(Error::InvalidInput("poll.interval_ms must be at least 1".to_owned()));
        }
        Ok(())
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is an error.
///
fn accept_dotenv(loaded: std::result::Result<PathBuf, dotenv::Error>) -> Result<()> {
    match loaded {
        Ok(path) => {
            tracing::info!(target: "config", path = %path.display(), ".env loaded.");
            Ok(())
        }
        Err(dotenv::Error::Io(error)) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(target: "config", "No .env file.");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

// -----------------------------------------------------------------------------

/// All settings required to reach and authenticate against the Isard API.
///
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Host name or base URL. A bare host is reached over `https`.
    pub endpoint: String,
    #[serde(default)]
    pub auth_method: AuthMethod,
    pub token: Option<SecretString>,
    #[serde(default = "default_category")]
    pub category_id: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    #[serde(default = "default_true")]
    pub ssl_verification: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the provider obtains its bearer token.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// A pre-issued token is used as is.
    #[default]
    Token,
    /// Username and password are exchanged for a token on the login endpoint.
    Form,
}

fn default_category() -> String {
    "default".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

// -----------------------------------------------------------------------------

/// Timing of the status poller and other eventual-consistency waits.
///
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub stop_timeout_secs: u64,
    pub not_found: NotFoundPolicy,
    /// Delay between creating a media and looking it up by name.
    pub media_settle_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            stop_timeout_secs: 120,
            not_found: NotFoundPolicy::default(),
            media_settle_ms: 2000,
        }
    }
}

impl PollConfig {
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.interval_ms).max(MIN_INTERVAL),
            not_found: self.not_found,
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    pub fn media_settle(&self) -> Duration {
        Duration::from_millis(self.media_settle_ms)
    }
}

// -----------------------------------------------------------------------------

/// Values filled in when neither the plan nor the remote side supplies one.
///
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub network: NetworkDefaults,
    pub desktop: DesktopDefaults,
    pub deployment: DeploymentDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkDefaults {
    pub model: String,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            model: "virtio".to_owned(),
        }
    }
}

/// Hardware fallbacks used when a template lacks a field.
///
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DesktopDefaults {
    pub vcpus: i64,
    pub memory: f64,
    pub interfaces: Vec<String>,
    pub videos: Vec<String>,
    pub boot_order: Vec<String>,
    pub disk_bus: String,
    pub vgpus: Vec<String>,
    pub image_type: String,
}

impl Default for DesktopDefaults {
    fn default() -> Self {
        Self {
            vcpus: 2,
            memory: 2.0,
            interfaces: vec!["default".to_owned()],
            videos: vec!["default".to_owned()],
            boot_order: vec!["disk".to_owned()],
            disk_bus: "default".to_owned(),
            vgpus: vec!["None".to_owned()],
            image_type: "user".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeploymentDefaults {
    pub vcpus: i64,
    pub memory: f64,
    pub interfaces: Vec<String>,
    pub visible: bool,
}

impl Default for DeploymentDefaults {
    fn default() -> Self {
        Self {
            vcpus: 2,
            memory: 2.0,
            interfaces: vec!["default".to_owned(), "wireguard".to_owned()],
            visible: false,
        }
    }
}

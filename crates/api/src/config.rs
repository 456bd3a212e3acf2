//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use sentiment::DEFAULT_CLASSIFIER_TIMEOUT;

/// LEAN BOT server configuration.
///
/// Provider settings (keys, models, prompts) are read by the provider
/// crates themselves; see `GeminiBrainConfig::from_env` and
/// `MistralBrainConfig::from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Provider used when a request names none.
    pub default_provider: String,
    /// Timeout of one sentiment classifier call.
    pub sentiment_timeout: Duration,
    /// Whether sentiment goes through Gemini before the keyword fallback.
    pub sentiment_use_gemini: bool,
    /// Register the echo provider as `mock`.
    pub enable_mock_provider: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `LEANBOT_ADDR` | Server bind address | `127.0.0.1:12000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:leanbot.db?mode=rwc` |
    /// | `LEANBOT_DEFAULT_PROVIDER` | Default reply provider | `gemini` |
    /// | `LEANBOT_MOCK_PROVIDER` | Register the `mock` echo provider | `false` |
    /// | `SENTIMENT_TIMEOUT_SECS` | Classifier timeout | `10` |
    /// | `SENTIMENT_USE_GEMINI` | Classify with Gemini first | `true` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("LEANBOT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:12000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:leanbot.db?mode=rwc".to_string());

        let default_provider = env::var("LEANBOT_DEFAULT_PROVIDER")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "gemini".to_string());

        let sentiment_timeout = match env::var("SENTIMENT_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_CLASSIFIER_TIMEOUT,
        };

        let sentiment_use_gemini = parse_bool("SENTIMENT_USE_GEMINI", true)?;
        let enable_mock_provider = parse_bool("LEANBOT_MOCK_PROVIDER", false)?;

        Ok(Self {
            addr,
            database_url,
            default_provider,
            sentiment_timeout,
            sentiment_use_gemini,
            enable_mock_provider,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(name)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid LEANBOT_ADDR format")]
    InvalidAddr,

    #[error("SENTIMENT_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("{0} must be true or false")]
    InvalidBool(&'static str),
}

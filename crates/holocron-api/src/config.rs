//! Client configuration loaded from the environment or built in code.

use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
pub const DEFAULT_USER_AGENT: &str = "holocron/0.3 (+https://github.com/holocron/holocron)";

/// Archive client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://swapi.dev/api`.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Cap on simultaneous outbound requests during relation fan-out.
    pub max_in_flight: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Load from environment variables, falling back to defaults:
    /// `HOLOCRON_API_URL`, `HOLOCRON_TIMEOUT_SECS`, `HOLOCRON_USER_AGENT`,
    /// `HOLOCRON_MAX_IN_FLIGHT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("HOLOCRON_API_URL") {
            Ok(base) => Self::new(&base)?,
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var("HOLOCRON_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("bad HOLOCRON_TIMEOUT_SECS: {raw}")))?;
        }
        if let Ok(agent) = std::env::var("HOLOCRON_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(raw) = std::env::var("HOLOCRON_MAX_IN_FLIGHT") {
            let parsed: usize = raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("bad HOLOCRON_MAX_IN_FLIGHT: {raw}")))?;
            if parsed == 0 {
                return Err(ConfigError::Invalid(
                    "HOLOCRON_MAX_IN_FLIGHT must be at least 1".to_string(),
                ));
            }
            config.max_in_flight = parsed;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, agent: &str) -> Self {
        self.user_agent = agent.to_string();
        self
    }

    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = limit.max(1);
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed =
        Url::parse(raw).map_err(|e| ConfigError::Invalid(format!("bad base URL `{raw}`: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "bad base URL `{raw}`: expected http or https"
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

use std::time::Duration;

use qtoday::ScraperConfig;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8055";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' (expected whole seconds)")]
    InvalidSeconds { name: &'static str, value: String },
}

/// Server settings read from the environment.
///
/// | Variable                  | Default                   |
/// |---------------------------|---------------------------|
/// | `BIND_ADDRESS`            | `127.0.0.1:8055`          |
/// | `QT_SOURCE_BASE_URL`      | `https://www.duranno.com` |
/// | `QT_REQUEST_TIMEOUT_SECS` | `10`                      |
/// | `QT_DEADLINE_SECS`        | `25`                      |
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub scraper: ScraperConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ScraperConfig::default();

        let seconds = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(value) => match value.trim().parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::InvalidSeconds { name, value }),
                },
            }
        };

        let request_timeout = seconds("QT_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?;
        let deadline = seconds("QT_DEADLINE_SECS", defaults.deadline)?;

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into()),
            scraper: ScraperConfig {
                base_url: lookup("QT_SOURCE_BASE_URL").unwrap_or(defaults.base_url),
                request_timeout,
                deadline,
            },
        })
    }
}

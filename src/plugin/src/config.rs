//! Environment-driven plugin configuration.

use std::env;

use anyhow::{bail, Result};
use tracing::warn;

pub const LOG_LEVEL_ENV_VAR: &str = "LOG_LEVEL";
pub const PORT_ENV_VAR: &str = "PORT";
pub const WEB_ENABLED_ENV_VAR: &str = "PLUGIN_WEB_ENABLED";
pub const CORS_ORIGINS_ENV_VAR: &str = "CORS_ALLOWED_ORIGINS";
pub const CORS_CREDENTIALS_ENV_VAR: &str = "CORS_ALLOW_CREDENTIALS";
pub const CORS_MAX_AGE_ENV_VAR: &str = "CORS_MAX_AGE";
pub const HEALTH_ENDPOINT_ENV_VAR: &str = "PLUGIN_HEALTH_ENDPOINT";
pub const TEST_MODE_ENV_VAR: &str = "TEST_MODE";

const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub log_level: String,
    /// 0 selects an ephemeral port.
    pub port: u16,
    pub web_enabled: bool,
    pub health_endpoint: bool,
    pub test_mode: bool,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: u64,
}

impl PluginConfig {
    pub fn from_env() -> Result<Self> {
        let log_level = match get_env_var(LOG_LEVEL_ENV_VAR) {
            Some(level) => {
                let level = level.to_lowercase();
                if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
                    bail!("{LOG_LEVEL_ENV_VAR} must be one of trace, debug, info, warn, error; got {level:?}");
                }
                level
            }
            None => "info".to_string(),
        };

        let port = match get_env_var(PORT_ENV_VAR) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => bail!("{PORT_ENV_VAR} must be an integer port number, got {raw:?}"),
            },
            None => 0,
        };

        let cors = CorsConfig::from_env()?;

        Ok(Self {
            log_level,
            port,
            web_enabled: bool_env(WEB_ENABLED_ENV_VAR),
            health_endpoint: bool_env(HEALTH_ENDPOINT_ENV_VAR),
            test_mode: bool_env(TEST_MODE_ENV_VAR),
            cors,
        })
    }
}

impl CorsConfig {
    fn from_env() -> Result<Self> {
        let allowed_origins: Vec<String> = get_env_var(CORS_ORIGINS_ENV_VAR)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let allow_credentials = bool_env(CORS_CREDENTIALS_ENV_VAR);
        let wildcard = allowed_origins.iter().any(|origin| origin == "*");

        if wildcard && allow_credentials {
            // Browsers reject this combination; refusing it at startup beats
            // silently serving an unusable CORS policy.
            bail!(
                "{CORS_ORIGINS_ENV_VAR}=* cannot be combined with {CORS_CREDENTIALS_ENV_VAR}=true"
            );
        }
        if wildcard {
            warn!("{CORS_ORIGINS_ENV_VAR} allows any origin; restrict it outside development");
        }

        let max_age_secs = match get_env_var(CORS_MAX_AGE_ENV_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => secs,
                Err(_) => bail!("{CORS_MAX_AGE_ENV_VAR} must be a non-negative integer, got {raw:?}"),
            },
            None => DEFAULT_CORS_MAX_AGE_SECS,
        };

        Ok(Self { allowed_origins, allow_credentials, max_age_secs })
    }
}

pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.is_empty())
}

fn bool_env(var: &str) -> bool {
    get_env_var(var).is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

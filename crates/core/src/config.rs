use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CRM_BASE_URL: &str = "https://api.hubapi.com";

pub const ENV_CRM_API_KEY: &str = "CALLERCTX_CRM_API_KEY";
pub const ENV_CRM_API_KEY_ALIAS: &str = "HUBSPOT_API_KEY";
pub const ENV_CRM_BASE_URL: &str = "CALLERCTX_CRM_BASE_URL";
pub const ENV_CRM_DEAL_SEARCH_METHOD: &str = "CALLERCTX_CRM_DEAL_SEARCH_METHOD";
pub const ENV_LOGGING_LEVEL: &str = "CALLERCTX_LOGGING_LEVEL";
pub const ENV_LOGGING_FORMAT: &str = "CALLERCTX_LOGGING_FORMAT";
pub const ENV_LOGGING_LEVEL_ALIAS: &str = "CALLERCTX_LOG_LEVEL";
pub const ENV_LOGGING_FORMAT_ALIAS: &str = "CALLERCTX_LOG_FORMAT";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub crm: CrmConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CrmConfig {
    /// Private-app access token. `None` disables every lookup.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub deal_search_method: DealSearchMethod,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// HTTP method used for the deal search.
///
/// HubSpot documents the search endpoints as POST. `Get` sends the JSON body
/// on a GET request, which is what existing deployments have always done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealSearchMethod {
    #[default]
    Get,
    Post,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub crm_api_key: Option<String>,
    pub crm_base_url: Option<String>,
    pub crm_deal_search_method: Option<DealSearchMethod>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crm: CrmConfig {
                api_key: None,
                base_url: DEFAULT_CRM_BASE_URL.to_string(),
                deal_search_method: DealSearchMethod::Get,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl CrmConfig {
    /// Credential usable for requests; blank tokens count as unset.
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn lookups_enabled(&self) -> bool {
        self.credential().is_some()
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl DealSearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl std::str::FromStr for DealSearchMethod {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            other => Err(ConfigError::Validation(format!(
                "unsupported deal search method `{other}` (expected get|post)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("callerctx.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(crm) = patch.crm {
            if let Some(crm_api_key_value) = crm.api_key {
                self.crm.api_key = Some(secret_value(crm_api_key_value));
            }
            if let Some(base_url) = crm.base_url {
                self.crm.base_url = base_url;
            }
            if let Some(deal_search_method) = crm.deal_search_method {
                self.crm.deal_search_method = deal_search_method;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let api_key = read_env(ENV_CRM_API_KEY).or_else(|| read_env(ENV_CRM_API_KEY_ALIAS));
        if let Some(value) = api_key {
            self.crm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env(ENV_CRM_BASE_URL) {
            self.crm.base_url = value;
        }
        if let Some(value) = read_env(ENV_CRM_DEAL_SEARCH_METHOD) {
            self.crm.deal_search_method =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: ENV_CRM_DEAL_SEARCH_METHOD.to_string(),
                    value: value.clone(),
                })?;
        }

        let log_level =
            read_env(ENV_LOGGING_LEVEL).or_else(|| read_env(ENV_LOGGING_LEVEL_ALIAS));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = [ENV_LOGGING_FORMAT, ENV_LOGGING_FORMAT_ALIAS]
            .into_iter()
            .find_map(|key| read_env(key).map(|value| (key, value)));
        if let Some((key, value)) = log_format {
            self.logging.format = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: key.to_string(),
                value: value.clone(),
            })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(crm_api_key) = overrides.crm_api_key {
            self.crm.api_key = Some(secret_value(crm_api_key));
        }
        if let Some(base_url) = overrides.crm_base_url {
            self.crm.base_url = base_url;
        }
        if let Some(deal_search_method) = overrides.crm_deal_search_method {
            self.crm.deal_search_method = deal_search_method;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_crm(&self.crm)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("callerctx.toml"), PathBuf::from("config/callerctx.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_crm(crm: &CrmConfig) -> Result<(), ConfigError> {
    let base_url = crm.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "crm.base_url must start with http:// or https://".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    crm: Option<CrmPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CrmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    deal_search_method: Option<DealSearchMethod>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

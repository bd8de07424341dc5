use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use callerctx_core::config::{
    AppConfig, LoadOptions, ENV_CRM_API_KEY, ENV_CRM_API_KEY_ALIAS, ENV_CRM_BASE_URL,
    ENV_CRM_DEAL_SEARCH_METHOD, ENV_LOGGING_FORMAT, ENV_LOGGING_FORMAT_ALIAS, ENV_LOGGING_LEVEL,
    ENV_LOGGING_LEVEL_ALIAS,
};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run(options: LoadOptions) -> String {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    let api_key = config.crm.api_key.as_ref().map(|key| redact_token(key.expose_secret()));
    lines.push(render_line(
        "crm.api_key",
        api_key.as_deref().unwrap_or("<unset>"),
        source("crm.api_key", &[ENV_CRM_API_KEY, ENV_CRM_API_KEY_ALIAS]),
    ));
    lines.push(render_line(
        "crm.base_url",
        &config.crm.base_url,
        source("crm.base_url", &[ENV_CRM_BASE_URL]),
    ));
    lines.push(render_line(
        "crm.deal_search_method",
        config.crm.deal_search_method.as_str(),
        source("crm.deal_search_method", &[ENV_CRM_DEAL_SEARCH_METHOD]),
    ));
    lines.push(render_line(
        "crm.lookups_enabled",
        if config.crm.lookups_enabled() { "true" } else { "false" },
        "derived (crm.api_key)".to_string(),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &[ENV_LOGGING_LEVEL, ENV_LOGGING_LEVEL_ALIAS]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &[ENV_LOGGING_FORMAT, ENV_LOGGING_FORMAT_ALIAS]),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("callerctx.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/callerctx.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env = env_keys
        .iter()
        .find(|key| env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = set_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the token kind and, for HubSpot private-app tokens, the region
/// (`pat-na1-`). Everything after that is hidden.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some(rest) = trimmed.strip_prefix("pat-") {
        if let Some((region, _)) = rest.split_once('-') {
            return format!("pat-{region}-***");
        }
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

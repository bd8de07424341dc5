use callerctx_core::config::{AppConfig, LoadOptions};
use callerctx_core::{format_context_for_prompt, LookupOutcome, SearchPhone};
use callerctx_crm::ContextFetcher;
use serde::Serialize;

use crate::commands::{current_thread_runtime, escape_json, CommandResult};
use crate::logging::init_logging;

#[derive(Debug, Serialize)]
pub struct LookupReport {
    pub phone: String,
    pub search_phone: String,
    #[serde(flatten)]
    pub outcome: LookupOutcome,
    pub prompt: String,
}

impl LookupReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|error| {
            format!(
                "{{\"outcome\":\"request_failed\",\"reason\":\"lookup serialization failed: {}\"}}",
                escape_json(&error.to_string())
            )
        })
    }
}

/// Every lookup outcome, soft failures included, exits 0; only a config or
/// runtime problem is a command failure.
pub fn run(options: LoadOptions, phone: &str, json_output: bool) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("lookup", "config_validation", error.to_string(), 2)
        }
    };
    init_logging(&config.logging);

    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("lookup", "runtime", format!("{error:#}"), 1),
    };
    let report = runtime.block_on(lookup_report(&config, phone));
    tracing::info!(
        event_name = "cli.lookup.completed",
        search_phone = %report.search_phone,
        outcome = report.outcome.as_str(),
        "caller lookup completed"
    );

    let output = if json_output { report.to_json() } else { report.prompt };
    CommandResult { exit_code: 0, output }
}

pub async fn lookup_report(config: &AppConfig, phone: &str) -> LookupReport {
    let fetcher = ContextFetcher::from_config(&config.crm);
    let outcome = fetcher.lookup(phone).await;
    let prompt = format_context_for_prompt(outcome.context());

    LookupReport {
        phone: phone.to_string(),
        search_phone: SearchPhone::normalize(phone).to_string(),
        outcome,
        prompt,
    }
}

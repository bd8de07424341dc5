use callerctx_core::config::{AppConfig, ConfigError, LoadOptions};
use callerctx_core::SearchPhone;
use callerctx_crm::{CrmSearch, HubspotClient};
use serde::Serialize;

use crate::commands::{current_thread_runtime, escape_json};

/// Phone used for the connectivity probe; it never matches a real contact.
const PROBE_PHONE: &str = "0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub overall_status: CheckStatus,
    pub summary: String,
    pub checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let loaded = AppConfig::load(options);
    let report = match current_thread_runtime() {
        Ok(runtime) => runtime.block_on(build_report(loaded)),
        Err(error) => DoctorReport::from_checks(vec![DoctorCheck {
            name: "runtime",
            status: CheckStatus::Fail,
            details: format!("{error:#}"),
        }]),
    };

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

pub async fn build_report(loaded: Result<AppConfig, ConfigError>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let credential = check_crm_credential(&config);
            let credential_ready = credential.status == CheckStatus::Pass;
            checks.push(credential);
            if credential_ready {
                checks.push(check_crm_connectivity(&config).await);
            } else {
                checks.push(DoctorCheck {
                    name: "crm_connectivity",
                    status: CheckStatus::Skipped,
                    details: "skipped because no crm api key is configured".to_string(),
                });
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["crm_credential", "crm_connectivity"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    DoctorReport::from_checks(checks)
}

impl DoctorReport {
    /// Skipped checks do not fail the report: running without a credential is
    /// a supported, lookup-disabled mode.
    fn from_checks(checks: Vec<DoctorCheck>) -> Self {
        let healthy = checks.iter().all(|check| check.status != CheckStatus::Fail);
        let overall_status = if healthy { CheckStatus::Pass } else { CheckStatus::Fail };
        let summary = if healthy {
            "doctor: all readiness checks passed".to_string()
        } else {
            "doctor: one or more readiness checks failed".to_string()
        };

        Self { overall_status, summary, checks }
    }
}

fn check_crm_credential(config: &AppConfig) -> DoctorCheck {
    if config.crm.lookups_enabled() {
        DoctorCheck {
            name: "crm_credential",
            status: CheckStatus::Pass,
            details: "crm api key configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "crm_credential",
            status: CheckStatus::Skipped,
            details: "crm api key not configured; caller lookups are disabled".to_string(),
        }
    }
}

async fn check_crm_connectivity(config: &AppConfig) -> DoctorCheck {
    let client = HubspotClient::new(&config.crm);
    match client.search_contacts(&SearchPhone::normalize(PROBE_PHONE)).await {
        Ok(_) => DoctorCheck {
            name: "crm_connectivity",
            status: CheckStatus::Pass,
            details: format!("contact search reachable at `{}`", client.base_url()),
        },
        Err(error) => DoctorCheck {
            name: "crm_connectivity",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

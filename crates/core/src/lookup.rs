use serde::Serialize;

use crate::domain::customer::CustomerContext;

/// Result of resolving a caller against the CRM.
///
/// Every variant except `Found` means "no context available" to a prompt
/// builder; the variants only differ for diagnostics and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found { context: CustomerContext },
    /// No CRM credential is configured.
    Disabled,
    NotFound,
    /// Either search request failed in transport, status, or decoding.
    RequestFailed { reason: String },
}

impl LookupOutcome {
    pub fn found(context: CustomerContext) -> Self {
        Self::Found { context }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::Disabled => "disabled",
            Self::NotFound => "not_found",
            Self::RequestFailed { .. } => "request_failed",
        }
    }

    pub fn context(&self) -> Option<&CustomerContext> {
        match self {
            Self::Found { context } => Some(context),
            Self::Disabled | Self::NotFound | Self::RequestFailed { .. } => None,
        }
    }

    pub fn into_context(self) -> Option<CustomerContext> {
        match self {
            Self::Found { context } => Some(context),
            Self::Disabled | Self::NotFound | Self::RequestFailed { .. } => None,
        }
    }
}

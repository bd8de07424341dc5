use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEndpoint {
    Contacts,
    Deals,
}

impl SearchEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contacts => "contact search",
            Self::Deals => "deal search",
        }
    }
}

impl fmt::Display for SearchEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("crm api key is not configured")]
    MissingCredential,
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: SearchEndpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: SearchEndpoint, status: StatusCode },
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: SearchEndpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl CrmError {
    pub fn endpoint(&self) -> Option<SearchEndpoint> {
        match self {
            Self::MissingCredential => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
        }
    }
}

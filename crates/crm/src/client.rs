use async_trait::async_trait;
use callerctx_core::config::{CrmConfig, DealSearchMethod};
use callerctx_core::{Contact, ContactId, Quote, SearchPhone};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CrmError, SearchEndpoint};
use crate::wire::{
    ContactSearchResponse, DealSearchResponse, SearchRequest, CONTACT_SEARCH_PATH,
    DEAL_SEARCH_PATH,
};

/// The two CRM queries a caller lookup needs.
#[async_trait]
pub trait CrmSearch: Send + Sync {
    /// Whether a credential is available. Lookups must not issue requests
    /// when this is false.
    fn is_configured(&self) -> bool;

    /// First contact whose phone exactly equals `phone`.
    async fn search_contacts(&self, phone: &SearchPhone) -> Result<Option<Contact>, CrmError>;

    /// Up to three deals for the contact, newest first.
    async fn search_deals(&self, contact_id: &ContactId) -> Result<Vec<Quote>, CrmError>;
}

/// HubSpot CRM v3 search client authenticated with a private-app token.
#[derive(Clone)]
pub struct HubspotClient {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
    deal_search_method: DealSearchMethod,
}

impl HubspotClient {
    pub fn new(config: &CrmConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: &CrmConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            api_key: config.credential().cloned(),
            deal_search_method: config.deal_search_method,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn search<T>(
        &self,
        endpoint: SearchEndpoint,
        method: Method,
        path: &str,
        body: &SearchRequest,
    ) -> Result<T, CrmError>
    where
        T: DeserializeOwned,
    {
        let api_key = self.api_key.as_ref().ok_or(CrmError::MissingCredential)?;
        let url = format!("{}{path}", self.base_url);
        debug!(
            event_name = "crm.request.sent",
            endpoint = endpoint.as_str(),
            method = method.as_str(),
            "sending crm search request"
        );

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|source| CrmError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Status { endpoint, status });
        }

        let bytes =
            response.bytes().await.map_err(|source| CrmError::Transport { endpoint, source })?;
        serde_json::from_slice(&bytes).map_err(|source| CrmError::Decode { endpoint, source })
    }
}

#[async_trait]
impl CrmSearch for HubspotClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search_contacts(&self, phone: &SearchPhone) -> Result<Option<Contact>, CrmError> {
        let response: ContactSearchResponse = self
            .search(
                SearchEndpoint::Contacts,
                Method::POST,
                CONTACT_SEARCH_PATH,
                &SearchRequest::contact_by_phone(phone),
            )
            .await?;

        Ok(response.results.into_iter().next().map(Contact::from))
    }

    async fn search_deals(&self, contact_id: &ContactId) -> Result<Vec<Quote>, CrmError> {
        let method = match self.deal_search_method {
            DealSearchMethod::Get => Method::GET,
            DealSearchMethod::Post => Method::POST,
        };
        let response: DealSearchResponse = self
            .search(
                SearchEndpoint::Deals,
                method,
                DEAL_SEARCH_PATH,
                &SearchRequest::recent_deals_for(contact_id),
            )
            .await?;

        Ok(response.results.unwrap_or_default().into_iter().map(Quote::from).collect())
    }
}

use callerctx_core::config::CrmConfig;
use callerctx_core::{CustomerContext, LookupOutcome, SearchPhone};
use tracing::{debug, info, warn};

use crate::client::{CrmSearch, HubspotClient};
use crate::error::CrmError;

/// Resolves an inbound caller's phone number to CRM context.
///
/// Requests are sequential: the deal search needs the contact id. Nothing is
/// retried and no timeout is set beyond the HTTP client's own; wrap calls in
/// `tokio::time::timeout` when a deadline is needed.
pub struct ContextFetcher<S> {
    search: S,
}

impl ContextFetcher<HubspotClient> {
    pub fn from_config(config: &CrmConfig) -> Self {
        Self::new(HubspotClient::new(config))
    }
}

impl<S> ContextFetcher<S>
where
    S: CrmSearch,
{
    pub fn new(search: S) -> Self {
        Self { search }
    }

    /// Context for the caller, or `None` when lookups are disabled, the number
    /// is unknown, or the CRM could not be reached.
    pub async fn fetch(&self, phone_number: &str) -> Option<CustomerContext> {
        self.lookup(phone_number).await.into_context()
    }

    pub async fn lookup(&self, phone_number: &str) -> LookupOutcome {
        if !self.search.is_configured() {
            info!(
                event_name = "crm.lookup.disabled",
                "crm api key not configured; skipping customer lookup"
            );
            return LookupOutcome::Disabled;
        }

        let phone = SearchPhone::normalize(phone_number);
        match self.resolve(&phone).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    event_name = "crm.lookup.failed",
                    search_phone = %phone,
                    endpoint = error.endpoint().map(|endpoint| endpoint.as_str()).unwrap_or("none"),
                    error = %error,
                    "error looking up customer in crm"
                );
                LookupOutcome::RequestFailed { reason: error.to_string() }
            }
        }
    }

    async fn resolve(&self, phone: &SearchPhone) -> Result<LookupOutcome, CrmError> {
        let Some(contact) = self.search.search_contacts(phone).await? else {
            info!(
                event_name = "crm.lookup.contact_not_found",
                search_phone = %phone,
                "no crm contact found for caller"
            );
            return Ok(LookupOutcome::NotFound);
        };
        info!(
            event_name = "crm.lookup.contact_found",
            search_phone = %phone,
            contact_id = %contact.id.0,
            "found crm contact"
        );

        let most_recent = self.search.search_deals(&contact.id).await?.into_iter().next();
        match &most_recent {
            Some(quote) => info!(
                event_name = "crm.lookup.deal_found",
                contact_id = %contact.id.0,
                deal_id = %quote.id.0,
                "found recent deal"
            ),
            None => debug!(
                event_name = "crm.lookup.no_deals",
                contact_id = %contact.id.0,
                "crm contact has no deals"
            ),
        }

        Ok(LookupOutcome::found(CustomerContext::for_contact(contact, most_recent)))
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

/// Most recent deal on record for a contact, projected from CRM deal properties.
///
/// Property values are kept exactly as the CRM returns them. HubSpot reports
/// numeric properties such as `amount` and `bedrooms` as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub service_type: Option<String>,
    pub frequency: Option<String>,
    pub amount: Option<String>,
    pub deal_stage: Option<String>,
    pub created_at: Option<String>,
}

/// Picks the service label for a deal: the explicit service type when set,
/// otherwise the cleaning type.
pub fn resolve_service_type(
    service_type: Option<String>,
    cleaning_type: Option<String>,
) -> Option<String> {
    service_type.filter(|value| !value.is_empty()).or(cleaning_type)
}

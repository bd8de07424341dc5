//! HubSpot CRM v3 search payloads.

use callerctx_core::domain::quote::resolve_service_type;
use callerctx_core::{Contact, ContactId, Quote, QuoteId, SearchPhone};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const CONTACT_SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";
pub const DEAL_SEARCH_PATH: &str = "/crm/v3/objects/deals/search";

pub const CONTACT_PROPERTIES: &[&str] = &["firstname", "lastname", "email", "phone", "createdate"];

pub const DEAL_PROPERTIES: &[&str] = &[
    "dealname",
    "amount",
    "dealstage",
    "createdate",
    "bedrooms",
    "bathrooms",
    "service_type",
    "frequency",
    "cleaning_type",
    "hs_object_id",
];

pub const CONTACT_SEARCH_LIMIT: u32 = 1;
pub const DEAL_SEARCH_LIMIT: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub filter_groups: Vec<FilterGroup>,
    pub properties: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterGroup {
    pub filters: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub property_name: &'static str,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Eq,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub property_name: &'static str,
    pub direction: SortDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Descending,
}

impl SearchRequest {
    /// Exact-match lookup of a single contact by phone.
    pub fn contact_by_phone(phone: &SearchPhone) -> Self {
        Self {
            filter_groups: vec![FilterGroup::single("phone", phone.as_str())],
            properties: CONTACT_PROPERTIES.to_vec(),
            sorts: Vec::new(),
            limit: CONTACT_SEARCH_LIMIT,
        }
    }

    /// Newest deals associated with a contact.
    pub fn recent_deals_for(contact_id: &ContactId) -> Self {
        Self {
            filter_groups: vec![FilterGroup::single("associations.contact", &contact_id.0)],
            properties: DEAL_PROPERTIES.to_vec(),
            sorts: vec![Sort { property_name: "createdate", direction: SortDirection::Descending }],
            limit: DEAL_SEARCH_LIMIT,
        }
    }
}

impl FilterGroup {
    fn single(property_name: &'static str, value: &str) -> Self {
        Self {
            filters: vec![Filter {
                property_name,
                operator: FilterOperator::Eq,
                value: value.to_string(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactSearchResponse {
    pub results: Vec<CrmObject<ContactProperties>>,
}

/// A missing or null `results` reads as "no deals".
#[derive(Debug, Deserialize)]
pub struct DealSearchResponse {
    #[serde(default)]
    pub results: Option<Vec<CrmObject<DealProperties>>>,
}

#[derive(Debug, Deserialize)]
pub struct CrmObject<P> {
    pub id: String,
    pub properties: P,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactProperties {
    #[serde(deserialize_with = "scalar_property")]
    pub firstname: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub lastname: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub email: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DealProperties {
    #[serde(deserialize_with = "scalar_property")]
    pub amount: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub dealstage: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub createdate: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub bedrooms: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub bathrooms: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub service_type: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub frequency: Option<String>,
    #[serde(deserialize_with = "scalar_property")]
    pub cleaning_type: Option<String>,
}

/// HubSpot property values are usually strings, but numbers and booleans are
/// accepted and rendered as their JSON text. Null reads as absent.
fn scalar_property<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(D::Error::custom(format!("expected a scalar property value, found {other}"))),
    }
}

impl From<CrmObject<ContactProperties>> for Contact {
    fn from(object: CrmObject<ContactProperties>) -> Self {
        let CrmObject { id, properties } = object;
        Self {
            id: ContactId(id),
            first_name: properties.firstname,
            last_name: properties.lastname,
            email: properties.email,
            phone: properties.phone,
        }
    }
}

impl From<CrmObject<DealProperties>> for Quote {
    fn from(object: CrmObject<DealProperties>) -> Self {
        let CrmObject { id, properties } = object;
        Self {
            id: QuoteId(id),
            bedrooms: properties.bedrooms,
            bathrooms: properties.bathrooms,
            service_type: resolve_service_type(properties.service_type, properties.cleaning_type),
            frequency: properties.frequency,
            amount: properties.amount,
            deal_stage: properties.dealstage,
            created_at: properties.createdate,
        }
    }
}

#[cfg(test)]
mod tests {
    use callerctx_core::{Contact, ContactId, Quote, SearchPhone};
    use serde_json::json;

    use super::{ContactSearchResponse, DealSearchResponse, SearchRequest};

    #[test]
    fn contact_search_body_matches_hubspot_shape() {
        let body = serde_json::to_value(SearchRequest::contact_by_phone(&SearchPhone::normalize(
            "415-555-1212",
        )))
        .expect("serialize contact search");

        assert_eq!(
            body,
            json!({
                "filterGroups": [{
                    "filters": [{ "propertyName": "phone", "operator": "EQ", "value": "+14155551212" }]
                }],
                "properties": ["firstname", "lastname", "email", "phone", "createdate"],
                "limit": 1
            })
        );
    }

    #[test]
    fn deal_search_body_sorts_newest_first() {
        let body =
            serde_json::to_value(SearchRequest::recent_deals_for(&ContactId("501".to_string())))
                .expect("serialize deal search");

        assert_eq!(
            body,
            json!({
                "filterGroups": [{
                    "filters": [{ "propertyName": "associations.contact", "operator": "EQ", "value": "501" }]
                }],
                "properties": [
                    "dealname", "amount", "dealstage", "createdate", "bedrooms", "bathrooms",
                    "service_type", "frequency", "cleaning_type", "hs_object_id"
                ],
                "sorts": [{ "propertyName": "createdate", "direction": "DESCENDING" }],
                "limit": 3
            })
        );
    }

    #[test]
    fn contact_result_projects_into_domain_contact() {
        let response: ContactSearchResponse = serde_json::from_value(json!({
            "total": 1,
            "results": [{
                "id": "501",
                "properties": {
                    "firstname": "Jane",
                    "lastname": "Doe",
                    "email": "jane@example.com",
                    "phone": "+14155551212",
                    "createdate": "2024-03-01T10:00:00.000Z",
                    "hs_object_id": "501"
                },
                "archived": false
            }]
        }))
        .expect("decode contact response");

        let contact = response.results.into_iter().next().map(Contact::from).expect("one contact");
        assert_eq!(contact.id, ContactId("501".to_string()));
        assert_eq!(contact.first_name.as_deref(), Some("Jane"));
        assert_eq!(contact.phone.as_deref(), Some("+14155551212"));
    }

    #[test]
    fn deal_result_falls_back_to_cleaning_type() {
        let response: DealSearchResponse = serde_json::from_value(json!({
            "results": [{
                "id": "9001",
                "properties": {
                    "bedrooms": "3",
                    "bathrooms": "2",
                    "service_type": null,
                    "cleaning_type": "move out",
                    "dealstage": "appointmentscheduled",
                    "createdate": "2024-05-02T08:00:00.000Z"
                }
            }]
        }))
        .expect("decode deal response");

        let quote = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Quote::from)
            .expect("one deal");
        assert_eq!(quote.service_type.as_deref(), Some("move out"));
        assert_eq!(quote.deal_stage.as_deref(), Some("appointmentscheduled"));
        assert_eq!(quote.created_at.as_deref(), Some("2024-05-02T08:00:00.000Z"));
        assert_eq!(quote.amount, None);
    }

    #[test]
    fn deal_response_without_results_reads_as_empty() {
        let response: DealSearchResponse =
            serde_json::from_value(json!({ "total": 0 })).expect("decode empty deal response");
        assert!(response.results.unwrap_or_default().is_empty());
    }

    #[test]
    fn contact_response_without_results_is_malformed() {
        let decoded = serde_json::from_value::<ContactSearchResponse>(json!({ "total": 0 }));
        assert!(decoded.is_err());
    }

    #[test]
    fn contact_result_without_id_is_malformed() {
        let decoded = serde_json::from_value::<ContactSearchResponse>(json!({
            "results": [{ "properties": { "firstname": "Jane" } }]
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn numeric_deal_properties_read_as_text() {
        let response: DealSearchResponse = serde_json::from_value(json!({
            "results": [{
                "id": "9002",
                "properties": {
                    "bedrooms": 3,
                    "bathrooms": 2,
                    "service_type": "standard",
                    "amount": 150,
                    "frequency": null
                }
            }]
        }))
        .expect("numeric properties should decode");

        let quote = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Quote::from)
            .expect("one deal");
        assert_eq!(quote.bedrooms.as_deref(), Some("3"));
        assert_eq!(quote.bathrooms.as_deref(), Some("2"));
        assert_eq!(quote.amount.as_deref(), Some("150"));
        assert_eq!(quote.frequency, None);
    }

    #[test]
    fn nested_property_values_are_malformed() {
        let decoded = serde_json::from_value::<DealSearchResponse>(json!({
            "results": [{ "id": "9003", "properties": { "amount": { "value": 150 } } }]
        }));
        assert!(decoded.is_err());
    }
}

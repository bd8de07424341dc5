use serde::{Deserialize, Serialize};

use crate::domain::quote::Quote;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// What is known about a caller once their phone number matched a CRM contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContext {
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_quote: Option<Quote>,
    pub is_existing_customer: bool,
    pub has_recent_quote: bool,
}

impl CustomerContext {
    /// Builds the context for a matched contact. `recent_quote` is the newest
    /// deal, if the contact has any.
    pub fn for_contact(contact: Contact, recent_quote: Option<Quote>) -> Self {
        let has_recent_quote = recent_quote.is_some();
        Self { contact, recent_quote, is_existing_customer: true, has_recent_quote }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Contact, ContactId, CustomerContext};
    use crate::domain::quote::{Quote, QuoteId};

    fn jane() -> Contact {
        Contact {
            id: ContactId("501".to_string()),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("+14155551212".to_string()),
        }
    }

    #[test]
    fn context_without_deal_omits_recent_quote_key() {
        let context = CustomerContext::for_contact(jane(), None);
        assert!(context.is_existing_customer);
        assert!(!context.has_recent_quote);

        let value = serde_json::to_value(&context).expect("serialize context");
        assert!(value.get("recentQuote").is_none());
        assert_eq!(value["hasRecentQuote"], json!(false));
        assert_eq!(value["isExistingCustomer"], json!(true));
        assert_eq!(value["contact"]["firstName"], json!("Jane"));
    }

    #[test]
    fn context_with_deal_flags_recent_quote() {
        let quote = Quote {
            id: QuoteId("9001".to_string()),
            amount: Some("150".to_string()),
            ..Quote::default()
        };
        let context = CustomerContext::for_contact(jane(), Some(quote));

        assert!(context.has_recent_quote);
        let value = serde_json::to_value(&context).expect("serialize context");
        assert_eq!(value["recentQuote"]["id"], json!("9001"));
        assert_eq!(value["recentQuote"]["amount"], json!("150"));
    }
}

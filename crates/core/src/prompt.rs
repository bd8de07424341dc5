//! Renders a [`CustomerContext`] as the caller-history block of an agent prompt.

use crate::domain::customer::CustomerContext;

pub const NO_CONTEXT_MESSAGE: &str = "No previous customer information available.";

/// Placeholder written in place of a field the CRM left empty. Prompt templates
/// downstream already expect this exact token.
pub const MISSING_FIELD: &str = "undefined";

pub fn format_context_for_prompt(context: Option<&CustomerContext>) -> String {
    let Some(context) = context else {
        return NO_CONTEXT_MESSAGE.to_string();
    };

    let mut rendered = format!(
        "Customer: {} {}",
        slot(context.contact.first_name.as_deref()),
        slot(context.contact.last_name.as_deref())
    );

    if context.has_recent_quote {
        let quote = context.recent_quote.as_ref();

        rendered.push_str(&format!(
            "\nRecent quote: {} bed/{} bath {}",
            slot(quote.and_then(|quote| quote.bedrooms.as_deref())),
            slot(quote.and_then(|quote| quote.bathrooms.as_deref())),
            slot(quote.and_then(|quote| quote.service_type.as_deref())),
        ));
        if let Some(frequency) = present(quote.and_then(|quote| quote.frequency.as_deref())) {
            rendered.push_str(&format!(" ({frequency})"));
        }
        if let Some(amount) = present(quote.and_then(|quote| quote.amount.as_deref())) {
            rendered.push_str(&format!(" - ${amount}"));
        }
    }

    rendered
}

fn slot(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_FIELD)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{format_context_for_prompt, NO_CONTEXT_MESSAGE};
    use crate::domain::customer::{Contact, ContactId, CustomerContext};
    use crate::domain::quote::{Quote, QuoteId};

    fn jane_doe() -> Contact {
        Contact {
            id: ContactId("501".to_string()),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Contact::default()
        }
    }

    fn deep_clean_quote() -> Quote {
        Quote {
            id: QuoteId("9001".to_string()),
            bedrooms: Some("3".to_string()),
            bathrooms: Some("2".to_string()),
            service_type: Some("deep clean".to_string()),
            frequency: Some("weekly".to_string()),
            amount: Some("150".to_string()),
            ..Quote::default()
        }
    }

    #[test]
    fn missing_context_renders_fallback_message() {
        assert_eq!(format_context_for_prompt(None), NO_CONTEXT_MESSAGE);
        assert_eq!(
            format_context_for_prompt(None),
            "No previous customer information available."
        );
    }

    #[test]
    fn contact_without_quote_renders_name_only() {
        let context = CustomerContext::for_contact(jane_doe(), None);
        assert_eq!(format_context_for_prompt(Some(&context)), "Customer: Jane Doe");
    }

    #[test]
    fn full_quote_renders_every_segment() {
        let context = CustomerContext::for_contact(jane_doe(), Some(deep_clean_quote()));
        assert_eq!(
            format_context_for_prompt(Some(&context)),
            "Customer: Jane Doe\nRecent quote: 3 bed/2 bath deep clean (weekly) - $150"
        );
    }

    #[test]
    fn frequency_and_amount_are_skipped_when_absent_or_empty() {
        let quote =
            Quote { frequency: None, amount: Some(String::new()), ..deep_clean_quote() };
        let context = CustomerContext::for_contact(jane_doe(), Some(quote));
        assert_eq!(
            format_context_for_prompt(Some(&context)),
            "Customer: Jane Doe\nRecent quote: 3 bed/2 bath deep clean"
        );
    }

    #[test]
    fn zero_amount_is_still_rendered() {
        let quote = Quote { amount: Some("0".to_string()), ..deep_clean_quote() };
        let context = CustomerContext::for_contact(jane_doe(), Some(quote));
        assert!(format_context_for_prompt(Some(&context)).ends_with("(weekly) - $0"));
    }

    #[test]
    fn absent_interpolated_fields_render_placeholder() {
        let contact = Contact { last_name: None, ..jane_doe() };
        let quote = Quote { bedrooms: None, service_type: None, ..deep_clean_quote() };
        let context = CustomerContext::for_contact(contact, Some(quote));
        assert_eq!(
            format_context_for_prompt(Some(&context)),
            "Customer: Jane undefined\nRecent quote: undefined bed/2 bath undefined (weekly) - $150"
        );
    }

    #[test]
    fn flagged_quote_without_payload_does_not_panic() {
        let context = CustomerContext {
            contact: jane_doe(),
            recent_quote: None,
            is_existing_customer: true,
            has_recent_quote: true,
        };
        assert_eq!(
            format_context_for_prompt(Some(&context)),
            "Customer: Jane Doe\nRecent quote: undefined bed/undefined bath undefined"
        );
    }
}

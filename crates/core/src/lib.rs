//! Domain model and pure logic for caller-context lookups.
//!
//! The CRM transport lives in `callerctx-crm`; this crate only knows how a
//! phone number becomes a search key, what a resolved caller looks like, and
//! how that is rendered into an agent prompt.

pub mod config;
pub mod domain;
pub mod lookup;
pub mod prompt;

pub use domain::customer::{Contact, ContactId, CustomerContext};
pub use domain::phone::SearchPhone;
pub use domain::quote::{Quote, QuoteId};
pub use lookup::LookupOutcome;
pub use prompt::format_context_for_prompt;

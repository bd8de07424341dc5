//! HubSpot transport for caller-context lookups.
//!
//! [`ContextFetcher`] runs the contact search and, when a contact matches, the
//! deal search, then folds the results into a [`callerctx_core::LookupOutcome`].
//! Failures never escape a lookup; they are logged and reported as
//! `RequestFailed`.

pub mod client;
pub mod error;
pub mod lookup;
pub mod wire;

pub use client::{CrmSearch, HubspotClient};
pub use error::{CrmError, SearchEndpoint};
pub use lookup::ContextFetcher;

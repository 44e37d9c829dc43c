//! Async client for the hosted record store behind parkdesk.
//!
//! The store exposes one REST resource per table (`/rest/v1/{table}`) with
//! PostgREST-style filtering (`column=eq.value`). This crate only speaks the
//! wire format:
//!
//! - **[`RestClient`]**: transport, auth headers, filter encoding and error
//!   mapping. Table endpoints (`list_tickets`, `claim_slot`, ...) are
//!   inherent methods defined in the [`tables`] modules.
//! - **[`Query`]**: builder for filter / order / limit query pairs.
//! - **Wire records** ([`models`]): loosely validated rows exactly as the
//!   store returns them. Domain validation happens in `parkdesk-core`.

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod tables;
pub mod transport;

pub use client::RestClient;
pub use error::Error;
pub use models::{
    NewPassRecord, NewTicketRecord, PassPatch, PassRecord, RateRecord, RateUpsert, SlotRecord,
    TicketPaymentPatch, TicketRecord,
};
pub use query::Query;
pub use transport::TransportConfig;

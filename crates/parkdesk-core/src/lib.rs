//! Business logic and domain model for parkdesk.
//!
//! - **[`FeeEngine`]**: pure pricing of new-ticket quotes (rate lookup with a
//!   default fallback and pass-holder exemption), overstay fines, and the
//!   on-read status derivation for passes and tickets. Every input is an
//!   explicit parameter, including `now`.
//!
//! - **[`Desk`]**: Facade over the hosted record store that runs the
//!   ticket and pass lifecycles: issuing a ticket claims its slot, paying or
//!   deleting it frees the slot, and checkout quotes are frozen until the
//!   officer confirms.
//!
//! - **Domain model** ([`model`]): Validated types (`Ticket`,
//!   `MonthlyPass`, `Rate`, `ParkingSlot`) built from the store's wire
//!   records in [`convert`].

pub mod config;
pub mod convert;
pub mod desk;
pub mod error;
pub mod fee;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DeskConfig;
pub use desk::{
    CheckoutQuote, DashboardSummary, Desk, NewPass, NewTicket, PassView, TicketFilter,
    TicketQuote, TicketView, UpdatePass,
};
pub use error::CoreError;
pub use fee::{
    FeeEngine, FeePolicy, MAX_TICKET_HOURS, OverdueFine, lenient_hours, parse_hours, pass_is_valid,
};

pub use model::{
    LicensePlate, MonthlyPass, ParkingSlot, PassDuration, PassStatus, Rate, Ticket,
    TicketDisplayStatus, TicketStatus, VehicleType,
};

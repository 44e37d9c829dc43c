//! Table endpoints, one module per record-store table.
//!
//! Each module adds inherent methods to [`RestClient`](crate::RestClient).

mod passes;
mod rates;
mod slots;
mod tickets;

pub const TICKETS: &str = "tickets";
pub const MONTHLY_PASSES: &str = "monthly_passes";
pub const RATES: &str = "rates";
pub const PARKING_SLOTS: &str = "parking_slots";

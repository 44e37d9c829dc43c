//! Canonical domain types.

mod pass;
mod plate;
mod rate;
mod slot;
mod ticket;
mod vehicle;

pub use pass::{MonthlyPass, PassDuration, PassStatus};
pub use plate::LicensePlate;
pub use rate::Rate;
pub use slot::ParkingSlot;
pub use ticket::{Ticket, TicketDisplayStatus, TicketStatus};
pub use vehicle::VehicleType;

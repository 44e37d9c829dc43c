// ── Desk facade ──
//
// Runs the ticket and pass lifecycles against the hosted record store.
// Every call is one or a few request/response round trips; nothing is
// cached between calls. Pricing is delegated to `FeeEngine`, and double
// booking or double payment is prevented by conditional updates on the
// store side (`is_occupied=eq.false`, `status=eq.Active`).

use std::time::Duration;

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use parkdesk_api::models::{NewPassRecord, NewTicketRecord, PassPatch, RateUpsert, TicketPaymentPatch};
use parkdesk_api::{RestClient, TransportConfig};

use crate::config::DeskConfig;
use crate::convert::convert_all;
use crate::error::CoreError;
use crate::fee::{FeeEngine, MAX_TICKET_HOURS, OverdueFine, pass_is_valid};
use crate::model::{
    LicensePlate, MonthlyPass, ParkingSlot, PassDuration, PassStatus, Rate, Ticket,
    TicketDisplayStatus, TicketStatus, VehicleType,
};

// ── Request / result types ───────────────────────────────────────────

/// Price preview for a ticket that has not been issued yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketQuote {
    pub vehicle_type: VehicleType,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub price: Decimal,
    /// The pass that makes this ticket free, if any.
    pub pass: Option<MonthlyPass>,
}

/// Officer input for a new ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub license_plate: String,
    pub vehicle_type: String,
    pub spot_id: String,
    pub hours: Decimal,
}

/// Snapshot of what a vehicle owes, shown to the officer before payment.
///
/// `mark_paid` charges exactly this fine as long as the quote is younger
/// than the policy's `quote_ttl_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub ticket_id: Uuid,
    pub license_plate: LicensePlate,
    pub spot_id: String,
    pub price: Decimal,
    pub fine: Decimal,
    pub overdue_hours: Decimal,
    pub total: Decimal,
    pub quoted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TicketFilter {
    #[default]
    All,
    /// Active and still inside the purchased time.
    Active,
    Paid,
    /// Active but past the purchased time.
    Overdue,
}

impl TicketFilter {
    /// Stored status to filter on server-side, if any.
    fn stored_status(self) -> Option<TicketStatus> {
        match self {
            Self::All => None,
            Self::Active | Self::Overdue => Some(TicketStatus::Active),
            Self::Paid => Some(TicketStatus::Paid),
        }
    }

    fn admits(self, status: TicketDisplayStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == TicketDisplayStatus::Active,
            Self::Paid => status == TicketDisplayStatus::Paid,
            Self::Overdue => status == TicketDisplayStatus::Overdue,
        }
    }
}

/// A ticket with its on-read status and current overstay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub display_status: TicketDisplayStatus,
    pub overdue: OverdueFine,
}

/// A pass with its on-read status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassView {
    #[serde(flatten)]
    pub pass: MonthlyPass,
    pub display_status: PassStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPass {
    pub customer_name: String,
    pub vehicle_number: String,
    pub phone: Option<String>,
    pub start_date: DateTime<Utc>,
    pub duration: PassDuration,
}

/// Editable pass fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePass {
    pub customer_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_slots: usize,
    pub occupied_slots: usize,
    pub active_tickets: usize,
    pub overdue_tickets: usize,
    pub active_passes: usize,
    /// Sum of price and fine over paid tickets.
    pub revenue: Decimal,
}

// ── Desk ─────────────────────────────────────────────────────────────

/// Entry point for all desk operations.
pub struct Desk {
    client: RestClient,
    fees: FeeEngine,
    url: Url,
    timeout: Duration,
}

impl Desk {
    pub fn new(config: DeskConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = RestClient::new(config.url.clone(), config.api_key, &transport)?;

        Ok(Self {
            client,
            fees: FeeEngine::new(config.fees),
            url: config.url,
            timeout: config.timeout,
        })
    }

    pub fn fees(&self) -> &FeeEngine {
        &self.fees
    }

    /// Translate a client error, filling in what the transport layer
    /// cannot know (configured timeout, store URL).
    fn lift(&self, err: parkdesk_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            },
            CoreError::ConnectionFailed { reason, .. } => CoreError::ConnectionFailed {
                url: self.url.to_string(),
                reason,
            },
            other => other,
        }
    }

    // ── Quotes ───────────────────────────────────────────────────────

    /// Price a prospective ticket for `plate`.
    pub async fn quote(
        &self,
        vehicle_type: &str,
        hours: Decimal,
        plate: &str,
        now: DateTime<Utc>,
    ) -> Result<TicketQuote, CoreError> {
        let (rates, pass) = tokio::try_join!(self.rates(), self.valid_pass(plate, now))?;

        let price = self
            .fees
            .quote_new_ticket(vehicle_type, hours, pass.as_ref(), &rates);
        debug!(vehicle_type, %hours, %price, pass_holder = pass.is_some(), "quoted ticket");

        Ok(TicketQuote {
            vehicle_type: VehicleType::from(vehicle_type),
            hours: hours.max(Decimal::ZERO),
            hourly_rate: self.fees.rate_for(vehicle_type, &rates),
            price,
            pass,
        })
    }

    /// The pass exempting `plate` at `now`, if any.
    async fn valid_pass(
        &self,
        plate: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<MonthlyPass>, CoreError> {
        let plate = LicensePlate::new(plate);
        if plate.is_empty() {
            return Ok(None);
        }

        let row = self
            .client
            .find_active_pass(plate.as_str(), now)
            .await
            .map_err(|e| self.lift(e))?;

        match row.map(MonthlyPass::try_from).transpose() {
            Ok(pass) => Ok(pass.filter(|p| pass_is_valid(p, now))),
            Err(e) => {
                warn!(%plate, error = %e, "ignoring malformed pass row");
                Ok(None)
            }
        }
    }

    // ── Ticket lifecycle ─────────────────────────────────────────────

    /// Issue a ticket: price it, claim its slot, then store it.
    ///
    /// Fails with `SlotOccupied` if the slot was already taken. The slot is
    /// released again if the ticket insert fails.
    pub async fn issue_ticket(
        &self,
        new: NewTicket,
        now: DateTime<Utc>,
    ) -> Result<Ticket, CoreError> {
        let plate = LicensePlate::new(&new.license_plate);
        let vehicle_type = new.vehicle_type.trim();
        let spot = new.spot_id.trim();

        if plate.is_empty() {
            return Err(CoreError::invalid("license plate is required"));
        }
        if vehicle_type.is_empty() {
            return Err(CoreError::invalid("vehicle type is required"));
        }
        if spot.is_empty() {
            return Err(CoreError::invalid("parking spot is required"));
        }
        if new.hours <= Decimal::ZERO {
            return Err(CoreError::invalid("hours must be greater than zero"));
        }
        if new.hours > Decimal::from(MAX_TICKET_HOURS) {
            return Err(CoreError::invalid(format!("hours must be at most {MAX_TICKET_HOURS}")));
        }

        let quote = self
            .quote(vehicle_type, new.hours, plate.as_str(), now)
            .await?;

        let claimed = self
            .client
            .claim_slot(spot)
            .await
            .map_err(|e| self.lift(e))?;
        if claimed.is_none() {
            return Err(CoreError::SlotOccupied {
                slot: spot.to_owned(),
            });
        }

        let record = NewTicketRecord {
            license_plate: plate.to_string(),
            vehicle_type: quote.vehicle_type.to_string(),
            spot_id: spot.to_owned(),
            created_at: now,
            hours: new.hours,
            price: quote.price,
            status: TicketStatus::Active.to_string(),
            is_pass_holder: quote.pass.is_some(),
        };

        let row = match self.client.insert_ticket(&record).await {
            Ok(row) => row,
            Err(e) => {
                warn!(slot = spot, error = %e, "ticket insert failed; releasing slot");
                self.release_slot_quietly(spot).await;
                return Err(self.lift(e));
            }
        };

        let ticket = Ticket::try_from(row)?;
        info!(
            id = %ticket.id,
            plate = %ticket.license_plate,
            slot = %ticket.spot_id,
            price = %ticket.price,
            "issued ticket"
        );
        Ok(ticket)
    }

    /// Freeze what ticket `id` owes at `now`.
    pub async fn checkout(&self, id: Uuid, now: DateTime<Utc>) -> Result<CheckoutQuote, CoreError> {
        let ticket = self.fetch_ticket(id).await?;
        if !ticket.is_active() {
            return Err(CoreError::AlreadyPaid { id });
        }

        let overdue = self.fees.compute_overdue_fine(&ticket, now);
        Ok(CheckoutQuote {
            ticket_id: ticket.id,
            license_plate: ticket.license_plate,
            spot_id: ticket.spot_id,
            price: ticket.price,
            fine: overdue.fine,
            overdue_hours: overdue.overdue_hours,
            total: ticket.price.saturating_add(overdue.fine),
            quoted_at: now,
        })
    }

    /// Charge a checkout quote: store the quoted fine, mark the ticket
    /// Paid and free its slot.
    pub async fn mark_paid(
        &self,
        quote: &CheckoutQuote,
        now: DateTime<Utc>,
    ) -> Result<Ticket, CoreError> {
        let ttl_secs = self.fees.policy().quote_ttl_secs;
        let age_secs = (now - quote.quoted_at).num_seconds();
        // Quotes dated after `now` count as stale.
        if age_secs < 0 || u64::try_from(age_secs).is_ok_and(|age| age > ttl_secs) {
            return Err(CoreError::StaleQuote {
                id: quote.ticket_id,
                ttl_secs,
            });
        }

        let patch = TicketPaymentPatch {
            status: TicketStatus::Paid.to_string(),
            fine_amount: quote.fine,
            exit_time: now,
        };
        let paid = self
            .client
            .pay_ticket(quote.ticket_id, &patch)
            .await
            .map_err(|e| self.lift(e))?;

        let Some(row) = paid else {
            // Either the ticket is gone or someone else already settled it.
            self.fetch_ticket(quote.ticket_id).await?;
            return Err(CoreError::AlreadyPaid {
                id: quote.ticket_id,
            });
        };

        let ticket = Ticket::try_from(row)?;
        self.release_slot_quietly(&ticket.spot_id).await;
        info!(
            id = %ticket.id,
            total = %ticket.total_charged(),
            "ticket paid"
        );
        Ok(ticket)
    }

    /// Delete a ticket. Frees its slot only if the ticket was still Active.
    pub async fn delete_ticket(&self, id: Uuid) -> Result<Ticket, CoreError> {
        let row = self
            .client
            .delete_ticket(id)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| CoreError::not_found("Ticket", id))?;

        let ticket = Ticket::try_from(row)?;
        if ticket.is_active() {
            self.release_slot_quietly(&ticket.spot_id).await;
        }
        info!(%id, "deleted ticket");
        Ok(ticket)
    }

    pub async fn tickets(
        &self,
        filter: TicketFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<TicketView>, CoreError> {
        let stored = filter.stored_status().map(|s| s.to_string());
        let rows = self
            .client
            .list_tickets(stored.as_deref())
            .await
            .map_err(|e| self.lift(e))?;

        Ok(convert_all::<_, Ticket>(rows, "tickets")
            .into_iter()
            .map(|t| self.view_ticket(t, now))
            .filter(|v| filter.admits(v.display_status))
            .collect())
    }

    pub async fn ticket(&self, id: Uuid, now: DateTime<Utc>) -> Result<TicketView, CoreError> {
        let ticket = self.fetch_ticket(id).await?;
        Ok(self.view_ticket(ticket, now))
    }

    async fn fetch_ticket(&self, id: Uuid) -> Result<Ticket, CoreError> {
        let row = self
            .client
            .get_ticket(id)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| CoreError::not_found("Ticket", id))?;
        Ticket::try_from(row)
    }

    fn view_ticket(&self, ticket: Ticket, now: DateTime<Utc>) -> TicketView {
        TicketView {
            display_status: self.fees.derive_ticket_status(&ticket, now),
            overdue: self.fees.compute_overdue_fine(&ticket, now),
            ticket,
        }
    }

    async fn release_slot_quietly(&self, slot: &str) {
        match self.client.release_slot(slot).await {
            Ok(Some(_)) => debug!(slot, "slot released"),
            Ok(None) => warn!(slot, "slot to release does not exist"),
            Err(e) => warn!(slot, error = %e, "failed to release slot"),
        }
    }

    // ── Passes ───────────────────────────────────────────────────────

    /// Create a pass running `duration` months from `start_date`.
    pub async fn create_pass(&self, new: NewPass) -> Result<MonthlyPass, CoreError> {
        let customer_name = new.customer_name.trim();
        let vehicle_number = LicensePlate::new(&new.vehicle_number);
        if customer_name.is_empty() {
            return Err(CoreError::invalid("customer name is required"));
        }
        if vehicle_number.is_empty() {
            return Err(CoreError::invalid("vehicle number is required"));
        }

        let end_date = new
            .start_date
            .checked_add_months(Months::new(new.duration.months()))
            .ok_or_else(|| CoreError::invalid("pass end date is out of range"))?;

        let record = NewPassRecord {
            customer_name: customer_name.to_owned(),
            vehicle_number: vehicle_number.to_string(),
            phone: clean_phone(new.phone),
            start_date: new.start_date,
            end_date,
            status: PassStatus::Active.to_string(),
        };
        let row = self
            .client
            .insert_pass(&record)
            .await
            .map_err(|e| self.lift(e))?;

        let pass = MonthlyPass::try_from(row)?;
        info!(id = %pass.id, vehicle = %pass.vehicle_number, end = %pass.end_date, "created pass");
        Ok(pass)
    }

    /// Edit customer details. Pass dates cannot be changed.
    pub async fn update_pass(&self, id: Uuid, update: UpdatePass) -> Result<MonthlyPass, CoreError> {
        let customer_name = match update.customer_name {
            Some(name) if name.trim().is_empty() => {
                return Err(CoreError::invalid("customer name cannot be blank"));
            }
            other => other.map(|n| n.trim().to_owned()),
        };
        let vehicle_number = match update.vehicle_number.map(LicensePlate::new) {
            Some(plate) if plate.is_empty() => {
                return Err(CoreError::invalid("vehicle number cannot be blank"));
            }
            other => other.map(String::from),
        };

        let patch = PassPatch {
            customer_name,
            vehicle_number,
            phone: update.phone.map(|p| p.trim().to_owned()),
        };
        if patch.is_empty() {
            return Err(CoreError::invalid("nothing to update"));
        }

        let row = self
            .client
            .update_pass(id, &patch)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| CoreError::not_found("Pass", id))?;
        info!(%id, "updated pass");
        MonthlyPass::try_from(row)
    }

    pub async fn revoke_pass(&self, id: Uuid) -> Result<MonthlyPass, CoreError> {
        let row = self
            .client
            .delete_pass(id)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| CoreError::not_found("Pass", id))?;
        info!(%id, "revoked pass");
        MonthlyPass::try_from(row)
    }

    /// All passes with their status as of `now`.
    pub async fn passes(&self, now: DateTime<Utc>) -> Result<Vec<PassView>, CoreError> {
        let rows = self.client.list_passes().await.map_err(|e| self.lift(e))?;
        Ok(convert_all::<_, MonthlyPass>(rows, "monthly_passes")
            .into_iter()
            .map(|pass| PassView {
                display_status: self.fees.derive_pass_status(&pass, now),
                pass,
            })
            .collect())
    }

    // ── Rates ────────────────────────────────────────────────────────

    pub async fn rates(&self) -> Result<Vec<Rate>, CoreError> {
        let rows = self.client.list_rates().await.map_err(|e| self.lift(e))?;
        Ok(convert_all(rows, "rates"))
    }

    /// Create or replace the hourly rate for `vehicle_type`.
    pub async fn set_rate(&self, vehicle_type: &str, hourly_rate: Decimal) -> Result<Rate, CoreError> {
        if vehicle_type.trim().is_empty() {
            return Err(CoreError::invalid("vehicle type is required"));
        }
        if hourly_rate < Decimal::ZERO {
            return Err(CoreError::invalid("hourly rate cannot be negative"));
        }

        let upsert = RateUpsert {
            vehicle_type: VehicleType::from(vehicle_type).to_string(),
            hourly_rate: hourly_rate.normalize(),
        };
        let row = self
            .client
            .upsert_rate(&upsert)
            .await
            .map_err(|e| self.lift(e))?;
        info!(vehicle_type = %upsert.vehicle_type, rate = %upsert.hourly_rate, "rate set");
        Rate::try_from(row)
    }

    pub async fn delete_rate(&self, vehicle_type: &str) -> Result<Rate, CoreError> {
        let canonical = VehicleType::from(vehicle_type).to_string();
        let row = self
            .client
            .delete_rate(&canonical)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| CoreError::not_found("Rate", &canonical))?;
        info!(vehicle_type = %canonical, "rate deleted");
        Rate::try_from(row)
    }

    // ── Slots & dashboard ────────────────────────────────────────────

    pub async fn slots(&self) -> Result<Vec<ParkingSlot>, CoreError> {
        let rows = self.client.list_slots().await.map_err(|e| self.lift(e))?;
        Ok(rows.into_iter().map(ParkingSlot::from).collect())
    }

    /// Occupancy, ticket counts and collected revenue as of `now`.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary, CoreError> {
        let (slots, tickets, passes) = tokio::try_join!(
            self.client.list_slots(),
            self.client.list_tickets(None),
            self.client.list_passes(),
        )
        .map_err(|e| self.lift(e))?;

        let tickets: Vec<Ticket> = convert_all(tickets, "tickets");
        let passes: Vec<MonthlyPass> = convert_all(passes, "monthly_passes");

        let mut summary = DashboardSummary {
            total_slots: slots.len(),
            occupied_slots: slots.iter().filter(|s| s.is_occupied).count(),
            active_tickets: 0,
            overdue_tickets: 0,
            active_passes: passes.iter().filter(|p| pass_is_valid(p, now)).count(),
            revenue: Decimal::ZERO,
        };

        for ticket in &tickets {
            match self.fees.derive_ticket_status(ticket, now) {
                TicketDisplayStatus::Active => summary.active_tickets += 1,
                TicketDisplayStatus::Overdue => summary.overdue_tickets += 1,
                TicketDisplayStatus::Paid => summary.revenue += ticket.total_charged(),
            }
        }
        summary.revenue = summary.revenue.normalize();

        Ok(summary)
    }
}

fn clean_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Overdue".parse::<TicketFilter>(), Ok(TicketFilter::Overdue));
        assert_eq!(TicketFilter::Paid.to_string(), "paid");
    }

    #[test]
    fn active_filter_excludes_overdue() {
        assert!(TicketFilter::Active.admits(TicketDisplayStatus::Active));
        assert!(!TicketFilter::Active.admits(TicketDisplayStatus::Overdue));
        assert_eq!(TicketFilter::Overdue.stored_status(), Some(TicketStatus::Active));
        assert_eq!(TicketFilter::All.stored_status(), None);
    }

    #[test]
    fn blank_phone_is_dropped() {
        assert_eq!(clean_phone(Some("  ".into())), None);
        assert_eq!(clean_phone(Some(" 98450 12345 ".into())), Some("98450 12345".into()));
    }
}

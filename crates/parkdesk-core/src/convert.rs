// ── Wire-to-domain conversions ──
//
// Bridges raw `parkdesk_api` rows into validated `parkdesk_core::model`
// types. Status and vehicle-type strings are parsed into enums, plates are
// normalized, and rows whose money or hour columns are negative are
// rejected with `CoreError::ValidationFailed`.

use rust_decimal::Decimal;
use tracing::warn;

use parkdesk_api::models::{PassRecord, RateRecord, SlotRecord, TicketRecord};

use crate::error::CoreError;
use crate::model::{
    LicensePlate, MonthlyPass, ParkingSlot, PassStatus, Rate, Ticket, TicketStatus, VehicleType,
};

// ── Helpers ────────────────────────────────────────────────────────

fn non_negative(value: Decimal, column: &str, table: &str) -> Result<Decimal, CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::invalid(format!(
            "{table}.{column} is negative ({value})"
        )));
    }
    Ok(value)
}

fn plate(raw: &str, column: &str, table: &str) -> Result<LicensePlate, CoreError> {
    let plate = LicensePlate::new(raw);
    if plate.is_empty() {
        return Err(CoreError::invalid(format!("{table}.{column} is blank")));
    }
    Ok(plate)
}

/// Convert every row, dropping (and logging) the ones that fail validation.
///
/// Listing views stay usable when a single row was hand-edited into an
/// invalid state.
pub(crate) fn convert_all<R, T>(rows: Vec<R>, table: &str) -> Vec<T>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(table, error = %e, "skipping invalid row");
                None
            }
        })
        .collect()
}

// ── Ticket ─────────────────────────────────────────────────────────

impl TryFrom<TicketRecord> for Ticket {
    type Error = CoreError;

    fn try_from(row: TicketRecord) -> Result<Self, Self::Error> {
        let status: TicketStatus = row.status.parse().map_err(|_| {
            CoreError::invalid(format!(
                "ticket {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: row.id,
            license_plate: plate(&row.license_plate, "license_plate", "tickets")?,
            vehicle_type: VehicleType::from(row.vehicle_type),
            spot_id: row.spot_id,
            created_at: row.created_at,
            hours: non_negative(row.hours, "hours", "tickets")?,
            price: non_negative(row.price, "price", "tickets")?,
            status,
            fine_amount: non_negative(row.fine_amount.unwrap_or_default(), "fine_amount", "tickets")?,
            is_pass_holder: row.is_pass_holder,
            exit_time: row.exit_time,
        })
    }
}

// ── Pass ───────────────────────────────────────────────────────────

impl TryFrom<PassRecord> for MonthlyPass {
    type Error = CoreError;

    fn try_from(row: PassRecord) -> Result<Self, Self::Error> {
        let status: PassStatus = row.status.parse().map_err(|_| {
            CoreError::invalid(format!("pass {} has unknown status {:?}", row.id, row.status))
        })?;
        if row.end_date < row.start_date {
            return Err(CoreError::invalid(format!(
                "pass {} ends before it starts",
                row.id
            )));
        }

        Ok(Self {
            id: row.id,
            customer_name: row.customer_name.trim().to_owned(),
            vehicle_number: plate(&row.vehicle_number, "vehicle_number", "monthly_passes")?,
            phone: row.phone.filter(|p| !p.trim().is_empty()),
            start_date: row.start_date,
            end_date: row.end_date,
            status,
        })
    }
}

// ── Rate ───────────────────────────────────────────────────────────

impl TryFrom<RateRecord> for Rate {
    type Error = CoreError;

    fn try_from(row: RateRecord) -> Result<Self, Self::Error> {
        if row.vehicle_type.trim().is_empty() {
            return Err(CoreError::invalid("rates.vehicle_type is blank"));
        }
        Ok(Self {
            vehicle_type: VehicleType::from(row.vehicle_type),
            hourly_rate: non_negative(row.hourly_rate, "hourly_rate", "rates")?,
        })
    }
}

// ── Slot ───────────────────────────────────────────────────────────

impl From<SlotRecord> for ParkingSlot {
    fn from(row: SlotRecord) -> Self {
        Self {
            id: row.id,
            slot_number: row.slot_number,
            is_occupied: row.is_occupied,
        }
    }
}

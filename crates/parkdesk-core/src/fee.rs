// ── Fee engine ──
//
// Pure pricing over already-fetched values. No I/O, no clock reads, no
// cached state: rates, the resolved pass and `now` are always parameters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::model::{MonthlyPass, PassStatus, Rate, Ticket, TicketDisplayStatus, TicketStatus};

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Longest stay a single ticket may be issued for (one leap year).
pub const MAX_TICKET_HOURS: u32 = 8_784;

// ── Policy ───────────────────────────────────────────────────────────

/// Tunable constants of the fee rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeePolicy {
    /// Hourly rate when no rate row matches the vehicle type.
    pub default_hourly_rate: Decimal,
    /// Flat penalty once a ticket overstays at all.
    pub overdue_base_fine: Decimal,
    /// Charged per started hour of overstay.
    pub overdue_hourly_fine: Decimal,
    /// Passes with this many days or fewer left show as "Expiring Soon".
    pub expiring_soon_days: i64,
    pub currency_symbol: String,
    /// How long a checkout quote may be charged after it was shown.
    pub quote_ttl_secs: u64,
    /// Pass holders pay no base fee; this also drops their overstay fine.
    pub waive_pass_holder_fines: bool,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            default_hourly_rate: Decimal::from(20),
            overdue_base_fine: Decimal::from(50),
            overdue_hourly_fine: Decimal::from(20),
            expiring_soon_days: 7,
            currency_symbol: "₹".into(),
            quote_ttl_secs: 300,
            waive_pass_holder_fines: false,
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────

/// Overstay assessment for an active ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverdueFine {
    pub fine: Decimal,
    /// Hours beyond the purchased duration, rounded to one decimal place.
    pub overdue_hours: Decimal,
}

impl OverdueFine {
    pub fn is_overdue(&self) -> bool {
        self.overdue_hours > Decimal::ZERO
    }
}

// ── Engine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FeeEngine {
    policy: FeePolicy,
}

impl FeeEngine {
    pub fn new(policy: FeePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    /// Hourly rate for `vehicle_type`, or the policy default if no rate
    /// row matches (an empty selection never matches).
    pub fn rate_for(&self, vehicle_type: &str, rates: &[Rate]) -> Decimal {
        rates
            .iter()
            .find(|r| r.vehicle_type.matches(vehicle_type))
            .map_or(self.policy.default_hourly_rate, |r| r.hourly_rate)
    }

    /// Price of a new ticket.
    ///
    /// A resolved pass makes the ticket free regardless of hours or type.
    /// Negative hours are treated as zero and a product too large for a
    /// `Decimal` saturates at `Decimal::MAX`; use [`lenient_hours`] or
    /// [`parse_hours`] to sanitize free-form input first.
    pub fn quote_new_ticket(
        &self,
        vehicle_type: &str,
        hours: Decimal,
        pass_holder: Option<&MonthlyPass>,
        rates: &[Rate],
    ) -> Decimal {
        if pass_holder.is_some() {
            return Decimal::ZERO;
        }
        let hours = hours.max(Decimal::ZERO);
        hours
            .saturating_mul(self.rate_for(vehicle_type, rates))
            .normalize()
    }

    /// Overstay fine for `ticket` at `now`.
    ///
    /// `fine = base + ceil(overdue_hours) × hourly`: a vehicle 0.1 h over
    /// pays for a full extra hour. Paid tickets and tickets still inside
    /// their purchased time yield zero.
    pub fn compute_overdue_fine(&self, ticket: &Ticket, now: DateTime<Utc>) -> OverdueFine {
        if ticket.status != TicketStatus::Active {
            return OverdueFine::default();
        }

        let elapsed = elapsed_hours(ticket.created_at, now);
        if elapsed <= ticket.hours {
            return OverdueFine::default();
        }

        let overdue = elapsed - ticket.hours;
        let fine = if self.policy.waive_pass_holder_fines && ticket.is_pass_holder {
            Decimal::ZERO
        } else {
            self.policy
                .overdue_base_fine
                .saturating_add(overdue.ceil().saturating_mul(self.policy.overdue_hourly_fine))
        };

        OverdueFine {
            fine: fine.normalize(),
            overdue_hours: overdue.round_dp(1),
        }
    }

    /// Display status of a pass at `now`.
    ///
    /// `days_left = ceil(end_date − now)` in days: zero or less is
    /// Expired, within the expiring-soon window is Expiring Soon, and
    /// otherwise the stored status is shown unchanged.
    pub fn derive_pass_status(&self, pass: &MonthlyPass, now: DateTime<Utc>) -> PassStatus {
        let remaining_ms = (pass.end_date - now).num_milliseconds();
        let days_left = (Decimal::from(remaining_ms) / Decimal::from(MILLIS_PER_DAY)).ceil();

        if days_left <= Decimal::ZERO {
            PassStatus::Expired
        } else if days_left <= Decimal::from(self.policy.expiring_soon_days) {
            PassStatus::ExpiringSoon
        } else {
            pass.status
        }
    }

    /// Display status of a ticket at `now`; overdue tickets stay Active in
    /// storage until an officer resolves them.
    pub fn derive_ticket_status(&self, ticket: &Ticket, now: DateTime<Utc>) -> TicketDisplayStatus {
        match ticket.status {
            TicketStatus::Paid => TicketDisplayStatus::Paid,
            TicketStatus::Active if elapsed_hours(ticket.created_at, now) > ticket.hours => {
                TicketDisplayStatus::Overdue
            }
            TicketStatus::Active => TicketDisplayStatus::Active,
        }
    }

    /// `₹60`, `₹12.5`
    pub fn format_currency(&self, amount: Decimal) -> String {
        format!("{}{}", self.policy.currency_symbol, amount.normalize())
    }
}

/// A pass exempts its vehicle iff it is stored Active and has not ended.
pub fn pass_is_valid(pass: &MonthlyPass, now: DateTime<Utc>) -> bool {
    pass.status == PassStatus::Active && pass.end_date >= now
}

/// Hours from a free-form numeric input. NaN, infinities and negatives are zero.
pub fn lenient_hours(raw: f64) -> Decimal {
    if !raw.is_finite() || raw <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(raw).unwrap_or(Decimal::ZERO)
}

/// Hours from a text field. Anything unparseable is zero.
pub fn parse_hours(raw: &str) -> Decimal {
    let raw = raw.trim();
    match raw.parse::<Decimal>() {
        Ok(hours) => hours.max(Decimal::ZERO),
        Err(_) => raw.parse::<f64>().map_or(Decimal::ZERO, lenient_hours),
    }
}

/// Fractional hours between two instants (negative if `to` precedes `from`).
fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    Decimal::from((to - from).num_milliseconds()) / Decimal::from(MILLIS_PER_HOUR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{LicensePlate, VehicleType};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rates() -> Vec<Rate> {
        vec![
            Rate {
                vehicle_type: VehicleType::Car,
                hourly_rate: dec("20"),
            },
            Rate {
                vehicle_type: VehicleType::Bike,
                hourly_rate: dec("10"),
            },
            Rate {
                vehicle_type: VehicleType::Truck,
                hourly_rate: dec("45"),
            },
        ]
    }

    fn pass(end_in: Duration) -> MonthlyPass {
        MonthlyPass {
            id: Uuid::new_v4(),
            customer_name: "Asha Rao".into(),
            vehicle_number: LicensePlate::new("KA01AB1234"),
            phone: None,
            start_date: now() - Duration::days(30),
            end_date: now() + end_in,
            status: PassStatus::Active,
        }
    }

    fn ticket(hours: &str, parked_for: Duration) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            license_plate: LicensePlate::new("KA01AB1234"),
            vehicle_type: VehicleType::Car,
            spot_id: "A-12".into(),
            created_at: now() - parked_for,
            hours: dec(hours),
            price: dec("60"),
            status: TicketStatus::Active,
            fine_amount: Decimal::ZERO,
            is_pass_holder: false,
            exit_time: None,
        }
    }

    // ── quote_new_ticket ──

    #[test]
    fn quote_is_hours_times_matching_rate() {
        let engine = FeeEngine::default();
        for (vehicle, hours, expected) in [
            ("Car", "3", "60"),
            ("Bike", "2.5", "25"),
            ("truck", "0.5", "22.5"),
        ] {
            assert_eq!(
                engine.quote_new_ticket(vehicle, dec(hours), None, &rates()),
                dec(expected),
                "{vehicle} for {hours}h"
            );
        }
    }

    #[test]
    fn unmatched_or_empty_type_uses_default_rate() {
        let engine = FeeEngine::default();
        assert_eq!(engine.quote_new_ticket("Van", dec("2"), None, &rates()), dec("40"));
        assert_eq!(engine.quote_new_ticket("", dec("1.5"), None, &rates()), dec("30"));
        assert_eq!(engine.quote_new_ticket("Car", dec("4"), None, &[]), dec("80"));
    }

    #[test]
    fn pass_holder_is_never_charged() {
        let engine = FeeEngine::default();
        let p = pass(Duration::days(20));
        assert_eq!(
            engine.quote_new_ticket("Truck", dec("12"), Some(&p), &rates()),
            Decimal::ZERO
        );
        assert_eq!(
            engine.quote_new_ticket("", Decimal::ZERO, Some(&p), &[]),
            Decimal::ZERO
        );
    }

    #[test]
    fn zero_or_negative_hours_price_to_zero() {
        let engine = FeeEngine::default();
        assert_eq!(engine.quote_new_ticket("Car", Decimal::ZERO, None, &rates()), Decimal::ZERO);
        assert_eq!(engine.quote_new_ticket("Car", dec("-3"), None, &rates()), Decimal::ZERO);
    }

    #[test]
    fn huge_hours_saturate_instead_of_overflowing() {
        let engine = FeeEngine::default();
        assert_eq!(engine.quote_new_ticket("Car", Decimal::MAX, None, &rates()), Decimal::MAX);
        let hours = parse_hours("79228162514264337593543950335");
        assert_eq!(engine.quote_new_ticket("Van", hours, None, &[]), Decimal::MAX);
    }

    #[test]
    fn quote_is_idempotent() {
        let engine = FeeEngine::default();
        let first = engine.quote_new_ticket("Bike", dec("3.5"), None, &rates());
        let second = engine.quote_new_ticket("Bike", dec("3.5"), None, &rates());
        assert_eq!(first, second);
    }

    #[test]
    fn lenient_hours_tolerates_garbage() {
        assert_eq!(lenient_hours(f64::NAN), Decimal::ZERO);
        assert_eq!(lenient_hours(f64::INFINITY), Decimal::ZERO);
        assert_eq!(lenient_hours(-2.0), Decimal::ZERO);
        assert_eq!(lenient_hours(1.5), dec("1.5"));
    }

    #[test]
    fn parse_hours_tolerates_garbage() {
        assert_eq!(parse_hours(" 2.5 "), dec("2.5"));
        assert_eq!(parse_hours("abc"), Decimal::ZERO);
        assert_eq!(parse_hours(""), Decimal::ZERO);
        assert_eq!(parse_hours("-1"), Decimal::ZERO);
        assert_eq!(parse_hours("NaN"), Decimal::ZERO);
        assert_eq!(parse_hours("1e1"), dec("10"));
    }

    // ── compute_overdue_fine ──

    #[test]
    fn no_fine_within_purchased_time() {
        let engine = FeeEngine::default();
        let within = engine.compute_overdue_fine(&ticket("2", Duration::minutes(90)), now());
        assert_eq!(within, OverdueFine::default());

        let exact = engine.compute_overdue_fine(&ticket("2", Duration::hours(2)), now());
        assert_eq!(exact, OverdueFine::default());
        assert!(!exact.is_overdue());
    }

    #[test]
    fn a_tenth_of_an_hour_over_pays_a_full_hour() {
        let engine = FeeEngine::default();
        let result = engine.compute_overdue_fine(&ticket("2", Duration::minutes(126)), now());
        assert_eq!(result.overdue_hours, dec("0.1"));
        assert_eq!(result.fine, dec("70"));
    }

    #[test]
    fn whole_hours_over_are_not_rounded_up_further() {
        let engine = FeeEngine::default();
        let result = engine.compute_overdue_fine(&ticket("2", Duration::hours(4)), now());
        assert_eq!(result.overdue_hours, dec("2.0"));
        assert_eq!(result.fine, dec("90"));
    }

    #[test]
    fn paid_tickets_accrue_no_fine() {
        let engine = FeeEngine::default();
        let mut t = ticket("1", Duration::hours(10));
        t.status = TicketStatus::Paid;
        assert_eq!(engine.compute_overdue_fine(&t, now()), OverdueFine::default());
    }

    #[test]
    fn pass_holders_are_fined_unless_policy_waives() {
        let mut t = ticket("1", Duration::hours(3));
        t.is_pass_holder = true;
        t.price = Decimal::ZERO;

        let default = FeeEngine::default().compute_overdue_fine(&t, now());
        assert_eq!(default.fine, dec("90"));

        let waiving = FeeEngine::new(FeePolicy {
            waive_pass_holder_fines: true,
            ..FeePolicy::default()
        });
        let waived = waiving.compute_overdue_fine(&t, now());
        assert_eq!(waived.fine, Decimal::ZERO);
        assert!(waived.is_overdue());
    }

    #[test]
    fn car_scenario_three_hours_bought_five_parked() {
        let engine = FeeEngine::default();
        let price = engine.quote_new_ticket("Car", dec("3"), None, &rates());
        assert_eq!(price, dec("60"));

        let mut t = ticket("3", Duration::hours(5));
        t.price = price;
        let result = engine.compute_overdue_fine(&t, now());
        assert_eq!(result.overdue_hours, dec("2"));
        assert_eq!(result.fine, dec("90"));
        assert_eq!(t.price + result.fine, dec("150"));
    }

    // ── status derivation ──

    #[test]
    fn pass_status_follows_days_left() {
        let engine = FeeEngine::default();
        assert_eq!(
            engine.derive_pass_status(&pass(-Duration::days(1)), now()),
            PassStatus::Expired
        );
        assert_eq!(
            engine.derive_pass_status(&pass(Duration::days(3)), now()),
            PassStatus::ExpiringSoon
        );
        assert_eq!(
            engine.derive_pass_status(&pass(Duration::days(7)), now()),
            PassStatus::ExpiringSoon
        );
        assert_eq!(
            engine.derive_pass_status(&pass(Duration::days(30)), now()),
            PassStatus::Active
        );
    }

    #[test]
    fn partial_last_day_counts_as_a_day_left() {
        let engine = FeeEngine::default();
        assert_eq!(
            engine.derive_pass_status(&pass(Duration::hours(2)), now()),
            PassStatus::ExpiringSoon
        );
        assert_eq!(
            engine.derive_pass_status(&pass(Duration::zero()), now()),
            PassStatus::Expired
        );
    }

    #[test]
    fn derived_pass_status_keeps_stored_value_outside_window() {
        let engine = FeeEngine::default();
        let mut p = pass(Duration::days(60));
        p.status = PassStatus::Expired;
        assert_eq!(engine.derive_pass_status(&p, now()), PassStatus::Expired);
    }

    #[test]
    fn pass_validity_requires_active_and_unexpired() {
        assert!(pass_is_valid(&pass(Duration::days(1)), now()));
        assert!(pass_is_valid(&pass(Duration::zero()), now()));
        assert!(!pass_is_valid(&pass(-Duration::seconds(1)), now()));

        let mut revoked = pass(Duration::days(10));
        revoked.status = PassStatus::Expired;
        assert!(!pass_is_valid(&revoked, now()));
    }

    #[test]
    fn ticket_status_is_derived_on_read() {
        let engine = FeeEngine::default();
        assert_eq!(
            engine.derive_ticket_status(&ticket("2", Duration::hours(1)), now()),
            TicketDisplayStatus::Active
        );
        assert_eq!(
            engine.derive_ticket_status(&ticket("2", Duration::hours(3)), now()),
            TicketDisplayStatus::Overdue
        );

        let mut paid = ticket("2", Duration::hours(3));
        paid.status = TicketStatus::Paid;
        assert_eq!(engine.derive_ticket_status(&paid, now()), TicketDisplayStatus::Paid);
    }

    #[test]
    fn currency_uses_policy_symbol() {
        let engine = FeeEngine::default();
        assert_eq!(engine.format_currency(dec("60.00")), "₹60");
        assert_eq!(engine.format_currency(dec("12.50")), "₹12.5");

        let dollars = FeeEngine::new(FeePolicy {
            currency_symbol: "$".into(),
            ..FeePolicy::default()
        });
        assert_eq!(dollars.format_currency(dec("7")), "$7");
    }
}

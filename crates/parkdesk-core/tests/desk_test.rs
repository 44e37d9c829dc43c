#![allow(clippy::unwrap_used)]
// Integration tests for `Desk` lifecycles against a wiremock record store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkdesk_core::{
    CoreError, Desk, DeskConfig, MAX_TICKET_HOURS, NewPass, NewTicket, PassDuration, PassStatus,
    TicketDisplayStatus, TicketFilter, TicketStatus, UpdatePass,
};

// ── Helpers ─────────────────────────────────────────────────────────

const TICKET_ID: &str = "0b7c6f2e-9d1a-4c55-8f3e-2a6b1d9e4c10";
const PASS_ID: &str = "5f0e3d7a-1b2c-4d8e-9f60-7a8b9c0d1e2f";

async fn setup() -> (MockServer, Desk) {
    let server = MockServer::start().await;
    let config = DeskConfig::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("anon-key".to_owned()),
    );
    let desk = Desk::new(config).unwrap();
    (server, desk)
}

/// 15:00 UTC; tickets in these tests were issued at 10:00.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 15, 0, 0).unwrap()
}

fn ticket_id() -> Uuid {
    TICKET_ID.parse().unwrap()
}

fn ticket_row(status: &str, hours: u32) -> serde_json::Value {
    let fine = if status == "Paid" { 90 } else { 0 };
    json!({
        "id": TICKET_ID,
        "license_plate": "KA01AB1234",
        "vehicle_type": "Car",
        "spot_id": "A-12",
        "created_at": "2024-06-15T10:00:00Z",
        "hours": hours,
        "price": 60,
        "status": status,
        "fine_amount": fine,
        "is_pass_holder": false,
        "exit_time": null
    })
}

fn pass_row(end_date: &str) -> serde_json::Value {
    json!({
        "id": PASS_ID,
        "customer_name": "Asha Rao",
        "vehicle_number": "MH12XY0001",
        "phone": null,
        "start_date": "2024-06-01T00:00:00Z",
        "end_date": end_date,
        "status": "Active"
    })
}

fn slot_row(number: &str, occupied: bool) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "slot_number": number,
        "is_occupied": occupied
    })
}

async fn mount_rates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "vehicle_type": "Bike", "hourly_rate": 10 },
            { "vehicle_type": "Car", "hourly_rate": 20 }
        ])))
        .mount(server)
        .await;
}

async fn mount_no_pass(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

fn new_ticket() -> NewTicket {
    NewTicket {
        license_plate: " ka01ab1234 ".into(),
        vehicle_type: "car".into(),
        spot_id: "A-12".into(),
        hours: Decimal::from(3),
    }
}

// ── Quotes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_quote_uses_matching_rate() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;
    mount_no_pass(&server).await;

    let quote = desk
        .quote("Car", Decimal::from(3), "KA01AB1234", now())
        .await
        .unwrap();

    assert_eq!(quote.hourly_rate, Decimal::from(20));
    assert_eq!(quote.price, Decimal::from(60));
    assert!(quote.pass.is_none());
}

#[tokio::test]
async fn test_quote_is_free_for_valid_pass_holder() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .and(query_param("vehicle_number", "eq.MH12XY0001"))
        .and(query_param("status", "eq.Active"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([pass_row("2024-07-01T00:00:00Z")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let quote = desk
        .quote("Truck", Decimal::from(8), "mh12xy0001", now())
        .await
        .unwrap();

    assert_eq!(quote.price, Decimal::ZERO);
    assert_eq!(quote.pass.unwrap().customer_name, "Asha Rao");
}

#[tokio::test]
async fn test_quote_with_blank_plate_skips_pass_lookup() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let quote = desk.quote("Van", Decimal::from(2), "  ", now()).await.unwrap();
    assert_eq!(quote.price, Decimal::from(40));
}

// ── Issuing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_issue_ticket_claims_slot_and_inserts() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;
    mount_no_pass(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .and(query_param("slot_number", "eq.A-12"))
        .and(query_param("is_occupied", "eq.false"))
        .and(body_json(json!({ "is_occupied": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([slot_row("A-12", true)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .and(body_partial_json(json!({
            "license_plate": "KA01AB1234",
            "vehicle_type": "Car",
            "status": "Active",
            "is_pass_holder": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([ticket_row("Active", 3)])))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = desk.issue_ticket(new_ticket(), now()).await.unwrap();

    assert_eq!(ticket.id, ticket_id());
    assert_eq!(ticket.price, Decimal::from(60));
    assert_eq!(ticket.status, TicketStatus::Active);
}

#[tokio::test]
async fn test_issue_ticket_on_occupied_slot_inserts_nothing() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;
    mount_no_pass(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([ticket_row("Active", 3)])))
        .expect(0)
        .mount(&server)
        .await;

    let err = desk.issue_ticket(new_ticket(), now()).await.unwrap_err();
    assert!(
        matches!(err, CoreError::SlotOccupied { ref slot } if slot == "A-12"),
        "expected SlotOccupied, got: {err:?}"
    );
}

#[tokio::test]
async fn test_failed_insert_releases_claimed_slot() {
    let (server, desk) = setup().await;
    mount_rates(&server).await;
    mount_no_pass(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .and(body_json(json!({ "is_occupied": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([slot_row("A-12", true)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .and(query_param("slot_number", "eq.A-12"))
        .and(body_json(json!({ "is_occupied": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([slot_row("A-12", false)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": "XX000",
            "message": "internal error"
        })))
        .mount(&server)
        .await;

    let err = desk.issue_ticket(new_ticket(), now()).await.unwrap_err();
    assert!(
        matches!(err, CoreError::Api { status: Some(500), .. }),
        "expected Api error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_issue_ticket_validates_input_before_any_request() {
    let (_server, desk) = setup().await;

    let mut missing_spot = new_ticket();
    missing_spot.spot_id = "  ".into();
    let mut zero_hours = new_ticket();
    zero_hours.hours = Decimal::ZERO;
    let mut over_a_year = new_ticket();
    over_a_year.hours = Decimal::from(MAX_TICKET_HOURS + 1);
    let mut overflowing = new_ticket();
    overflowing.hours = Decimal::MAX;

    for input in [missing_spot, zero_hours, over_a_year, overflowing] {
        let err = desk.issue_ticket(input, now()).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }), "{err:?}");
    }
}

// ── Checkout & payment ──────────────────────────────────────────────

#[tokio::test]
async fn test_checkout_quotes_overstay_fine() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", format!("eq.{TICKET_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3)])))
        .mount(&server)
        .await;

    let quote = desk.checkout(ticket_id(), now()).await.unwrap();

    assert_eq!(quote.price, Decimal::from(60));
    assert_eq!(quote.overdue_hours, Decimal::from(2));
    assert_eq!(quote.fine, Decimal::from(90));
    assert_eq!(quote.total, Decimal::from(150));
    assert_eq!(quote.quoted_at, now());
}

#[tokio::test]
async fn test_checkout_of_paid_ticket_fails() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Paid", 3)])))
        .mount(&server)
        .await;

    let err = desk.checkout(ticket_id(), now()).await.unwrap_err();
    assert!(matches!(err, CoreError::AlreadyPaid { .. }), "{err:?}");
}

#[tokio::test]
async fn test_checkout_of_unknown_ticket_is_not_found() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = desk.checkout(ticket_id(), now()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_mark_paid_charges_quoted_fine_and_frees_slot() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3)])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("status", "eq.Active"))
        .and(body_partial_json(json!({ "status": "Paid", "fine_amount": "90" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Paid", 3)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .and(query_param("slot_number", "eq.A-12"))
        .and(body_json(json!({ "is_occupied": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([slot_row("A-12", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let quote = desk.checkout(ticket_id(), now()).await.unwrap();
    // Officer confirms a minute later; the fine must not drift.
    let paid = desk
        .mark_paid(&quote, now() + Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(paid.status, TicketStatus::Paid);
    assert_eq!(paid.total_charged(), Decimal::from(150));
}

#[tokio::test]
async fn test_mark_paid_rejects_stale_quote() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3)])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let quote = desk.checkout(ticket_id(), now()).await.unwrap();
    let err = desk
        .mark_paid(&quote, now() + Duration::minutes(6))
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::StaleQuote { ttl_secs: 300, .. }),
        "expected StaleQuote, got: {err:?}"
    );
}

#[tokio::test]
async fn test_mark_paid_rejects_quote_dated_in_the_future() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3)])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut quote = desk.checkout(ticket_id(), now()).await.unwrap();
    quote.quoted_at = now() + Duration::hours(1);
    let err = desk.mark_paid(&quote, now()).await.unwrap_err();

    assert!(
        matches!(err, CoreError::StaleQuote { .. }),
        "expected StaleQuote, got: {err:?}"
    );
}

#[tokio::test]
async fn test_mark_paid_twice_reports_already_paid() {
    let (server, desk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Paid", 3)])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let quote = parkdesk_core::CheckoutQuote {
        ticket_id: ticket_id(),
        license_plate: "KA01AB1234".parse().unwrap(),
        spot_id: "A-12".into(),
        price: Decimal::from(60),
        fine: Decimal::from(90),
        overdue_hours: Decimal::from(2),
        total: Decimal::from(150),
        quoted_at: now(),
    };
    let err = desk.mark_paid(&quote, now()).await.unwrap_err();

    assert!(matches!(err, CoreError::AlreadyPaid { .. }), "{err:?}");
}

#[tokio::test]
async fn test_deleting_paid_ticket_leaves_slot_alone() {
    let (server, desk) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", format!("eq.{TICKET_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("Paid", 3)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let deleted = desk.delete_ticket(ticket_id()).await.unwrap();
    assert_eq!(deleted.status, TicketStatus::Paid);
}

// ── Listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_overdue_filter_derives_status_on_read() {
    let (server, desk) = setup().await;

    let mut on_time = ticket_row("Active", 8);
    on_time["id"] = json!(Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("status", "eq.Active"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3), on_time])),
        )
        .mount(&server)
        .await;

    let overdue = desk.tickets(TicketFilter::Overdue, now()).await.unwrap();

    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].ticket.id, ticket_id());
    assert_eq!(overdue[0].display_status, TicketDisplayStatus::Overdue);
    assert_eq!(overdue[0].overdue.fine, Decimal::from(90));
}

#[tokio::test]
async fn test_passes_show_derived_status() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .and(query_param("order", "end_date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            pass_row("2024-06-14T00:00:00Z"),
            pass_row("2024-06-18T00:00:00Z"),
            pass_row("2024-07-15T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let statuses: Vec<PassStatus> = desk
        .passes(now())
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.display_status)
        .collect();

    assert_eq!(
        statuses,
        vec![PassStatus::Expired, PassStatus::ExpiringSoon, PassStatus::Active]
    );
}

#[tokio::test]
async fn test_dashboard_summarizes_lot() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            slot_row("A-1", true),
            slot_row("A-2", false),
            slot_row("A-12", true),
        ])))
        .mount(&server)
        .await;

    let mut on_time = ticket_row("Active", 8);
    on_time["id"] = json!(Uuid::new_v4());
    let mut paid = ticket_row("Paid", 3);
    paid["id"] = json!(Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([ticket_row("Active", 3), on_time, paid])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            pass_row("2024-06-14T00:00:00Z"),
            pass_row("2024-07-15T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let summary = desk.dashboard(now()).await.unwrap();

    assert_eq!(summary.total_slots, 3);
    assert_eq!(summary.occupied_slots, 2);
    assert_eq!(summary.active_tickets, 1);
    assert_eq!(summary.overdue_tickets, 1);
    assert_eq!(summary.active_passes, 1);
    assert_eq!(summary.revenue, Decimal::from(150));
}

#[tokio::test]
async fn test_dashboard_skips_revoked_pass_inside_expiry_window() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut revoked = pass_row("2024-06-18T15:00:00Z");
    revoked["id"] = json!(Uuid::new_v4());
    revoked["status"] = json!("Expired");

    Mock::given(method("GET"))
        .and(path("/rest/v1/monthly_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            revoked,
            pass_row("2024-06-18T15:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let summary = desk.dashboard(now()).await.unwrap();
    assert_eq!(summary.active_passes, 1);
}

// ── Passes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_pass_ends_after_duration() {
    let (server, desk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/monthly_passes"))
        .and(body_partial_json(json!({
            "customer_name": "Asha Rao",
            "vehicle_number": "MH12XY0001",
            "start_date": "2024-01-31T00:00:00Z",
            "end_date": "2024-02-29T00:00:00Z",
            "status": "Active"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": PASS_ID,
            "customer_name": "Asha Rao",
            "vehicle_number": "MH12XY0001",
            "phone": null,
            "start_date": "2024-01-31T00:00:00Z",
            "end_date": "2024-02-29T00:00:00Z",
            "status": "Active"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let pass = desk
        .create_pass(NewPass {
            customer_name: " Asha Rao ".into(),
            vehicle_number: "mh12xy0001".into(),
            phone: Some(String::new()),
            start_date: Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
            duration: PassDuration::OneMonth,
        })
        .await
        .unwrap();

    assert_eq!(
        pass.end_date,
        Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_update_pass_rejects_blank_name() {
    let (_server, desk) = setup().await;

    let err = desk
        .update_pass(
            PASS_ID.parse().unwrap(),
            UpdatePass {
                customer_name: Some("   ".into()),
                ..UpdatePass::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn test_revoke_unknown_pass_is_not_found() {
    let (server, desk) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/monthly_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = desk.revoke_pass(PASS_ID.parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");
}

// ── Rates & errors ──────────────────────────────────────────────────

#[tokio::test]
async fn test_set_rate_canonicalizes_vehicle_type() {
    let (server, desk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rates"))
        .and(query_param("on_conflict", "vehicle_type"))
        .and(body_json(json!({ "vehicle_type": "Truck", "hourly_rate": "45" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": Uuid::new_v4(), "vehicle_type": "Truck", "hourly_rate": 45 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rate = desk.set_rate("truck", Decimal::new(4500, 2)).await.unwrap();
    assert_eq!(rate.hourly_rate, Decimal::from(45));
}

#[tokio::test]
async fn test_rejected_key_maps_to_authentication_failed() {
    let (server, desk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/parking_slots"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = desk.slots().await.unwrap_err();
    assert!(
        matches!(err, CoreError::AuthenticationFailed { ref message } if message == "Invalid API key"),
        "{err:?}"
    );
}

//! Ticket command handlers.

use chrono::Utc;
use tabled::Tabled;

use parkdesk_core::{CheckoutQuote, Desk, FeeEngine, NewTicket, TicketFilter, TicketView, parse_hours};

use crate::cli::{GlobalOpts, TicketStatusFilter, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Type")]
    vehicle_type: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Fine")]
    fine: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl TicketRow {
    fn new(view: &TicketView, fees: &FeeEngine, color: bool) -> Self {
        let t = &view.ticket;
        // Paid tickets show what was charged, active ones what is accruing
        let fine = if t.is_active() {
            view.overdue.fine
        } else {
            t.fine_amount
        };
        Self {
            id: t.id.to_string(),
            plate: t.license_plate.to_string(),
            vehicle_type: t.vehicle_type.to_string(),
            slot: t.spot_id.clone(),
            issued: util::short_time(t.created_at),
            hours: t.hours.normalize().to_string(),
            price: fees.format_currency(t.price),
            fine: fees.format_currency(fine),
            status: output::ticket_status(view.display_status, color),
        }
    }
}

impl From<TicketStatusFilter> for TicketFilter {
    fn from(f: TicketStatusFilter) -> Self {
        match f {
            TicketStatusFilter::All => Self::All,
            TicketStatusFilter::Active => Self::Active,
            TicketStatusFilter::Paid => Self::Paid,
            TicketStatusFilter::Overdue => Self::Overdue,
        }
    }
}

fn detail(view: &TicketView, fees: &FeeEngine, color: bool) -> String {
    let t = &view.ticket;
    let mut fields = vec![
        ("ID", t.id.to_string()),
        ("Plate", t.license_plate.to_string()),
        ("Type", t.vehicle_type.to_string()),
        ("Slot", t.spot_id.clone()),
        ("Issued", util::short_time(t.created_at)),
        ("Hours", t.hours.normalize().to_string()),
        ("Price", fees.format_currency(t.price)),
        ("Status", output::ticket_status(view.display_status, color)),
    ];
    if t.is_pass_holder {
        fields.push(("Pass holder", "yes".into()));
    }
    if view.overdue.is_overdue() {
        fields.push(("Overdue", format!("{}h", view.overdue.overdue_hours)));
        fields.push(("Fine so far", fees.format_currency(view.overdue.fine)));
    }
    if let Some(exit) = t.exit_time {
        fields.push(("Fine", fees.format_currency(t.fine_amount)));
        fields.push(("Total", fees.format_currency(t.total_charged())));
        fields.push(("Exited", util::short_time(exit)));
    }
    output::detail_block(&fields)
}

fn checkout_summary(quote: &CheckoutQuote, fees: &FeeEngine) -> String {
    let mut fields = vec![
        ("Plate", quote.license_plate.to_string()),
        ("Slot", quote.spot_id.clone()),
        ("Price", fees.format_currency(quote.price)),
    ];
    if quote.overdue_hours > rust_decimal::Decimal::ZERO {
        fields.push(("Overdue", format!("{}h", quote.overdue_hours)));
    }
    fields.push(("Fine", fees.format_currency(quote.fine)));
    fields.push(("Total", fees.format_currency(quote.total)));
    output::detail_block(&fields)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &Desk, args: TicketsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fees = desk.fees();
    let color = output::should_color(&global.color);

    match args.command {
        TicketsCommand::List { status } => {
            let views = desk.tickets(status.into(), Utc::now()).await?;
            let out = output::render_list(
                &global.output,
                &views,
                |v| TicketRow::new(v, fees, color),
                |v| v.ticket.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Get { id } => {
            let id = util::parse_id(&id, "ticket")?;
            let view = desk.ticket(id, Utc::now()).await?;
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, fees, color),
                |v| v.ticket.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Issue {
            plate,
            vehicle_type,
            spot,
            hours,
        } => {
            let new = NewTicket {
                license_plate: plate,
                vehicle_type,
                spot_id: spot,
                hours: parse_hours(&hours),
            };
            let ticket = desk.issue_ticket(new, Utc::now()).await?;
            let out = output::render_single(
                &global.output,
                &ticket,
                |t| {
                    let mut fields = vec![
                        ("ID", t.id.to_string()),
                        ("Plate", t.license_plate.to_string()),
                        ("Slot", t.spot_id.clone()),
                        ("Price", fees.format_currency(t.price)),
                    ];
                    if t.is_pass_holder {
                        fields.push(("Pass holder", "yes".into()));
                    }
                    output::detail_block(&fields)
                },
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Checkout { id } => {
            let id = util::parse_id(&id, "ticket")?;
            let quote = desk.checkout(id, Utc::now()).await?;

            util::note(global.quiet, &checkout_summary(&quote, fees));
            let prompt = format!(
                "Collect {} for {}?",
                fees.format_currency(quote.total),
                quote.license_plate
            );
            if !util::confirm(&prompt, "tickets checkout", global.yes)? {
                util::note(global.quiet, "Checkout cancelled");
                return Ok(());
            }

            let ticket = desk.mark_paid(&quote, Utc::now()).await?;
            let out = output::render_single(
                &global.output,
                &ticket,
                |t| {
                    format!(
                        "Collected {} from {}; slot {} is free",
                        fees.format_currency(t.total_charged()),
                        t.license_plate,
                        t.spot_id
                    )
                },
                |t| t.total_charged().normalize().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Delete { id } => {
            let id = util::parse_id(&id, "ticket")?;
            if !util::confirm(
                &format!("Delete ticket {id}? This cannot be undone."),
                "tickets delete",
                global.yes,
            )? {
                return Ok(());
            }
            let ticket = desk.delete_ticket(id).await?;
            util::note(
                global.quiet,
                &format!("Ticket {} for {} deleted", ticket.id, ticket.license_plate),
            );
            Ok(())
        }
    }
}

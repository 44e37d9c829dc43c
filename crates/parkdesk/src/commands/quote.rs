//! Price preview for a ticket that has not been issued.

use chrono::Utc;

use parkdesk_core::{Desk, TicketQuote, parse_hours};

use crate::cli::{GlobalOpts, QuoteArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(desk: &Desk, args: QuoteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let hours = parse_hours(&args.hours);
    let plate = args.plate.unwrap_or_default();

    let quote = desk
        .quote(&args.vehicle_type, hours, &plate, Utc::now())
        .await?;

    let fees = desk.fees();
    let out = output::render_single(
        &global.output,
        &quote,
        |q: &TicketQuote| {
            let mut fields = vec![
                ("Vehicle", q.vehicle_type.to_string()),
                ("Hours", q.hours.normalize().to_string()),
                ("Rate", format!("{}/h", fees.format_currency(q.hourly_rate))),
                ("Price", fees.format_currency(q.price)),
            ];
            if let Some(ref pass) = q.pass {
                fields.push((
                    "Pass",
                    format!("{} (until {})", pass.customer_name, pass.end_date.date_naive()),
                ));
            }
            output::detail_block(&fields)
        },
        |q| q.price.normalize().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Hourly rate command handlers.

use tabled::Tabled;

use parkdesk_core::{Desk, FeeEngine, Rate};

use crate::cli::{GlobalOpts, RatesArgs, RatesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Vehicle type")]
    vehicle_type: String,
    #[tabled(rename = "Hourly rate")]
    hourly_rate: String,
}

impl RateRow {
    fn new(rate: &Rate, fees: &FeeEngine) -> Self {
        Self {
            vehicle_type: rate.vehicle_type.to_string(),
            hourly_rate: fees.format_currency(rate.hourly_rate),
        }
    }
}

pub async fn handle(desk: &Desk, args: RatesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fees = desk.fees();

    match args.command {
        RatesCommand::List => {
            let rates = desk.rates().await?;
            if rates.is_empty() {
                util::note(
                    global.quiet,
                    &format!(
                        "No rates configured; every vehicle pays the default {}/h",
                        fees.format_currency(fees.policy().default_hourly_rate)
                    ),
                );
            }
            let out = output::render_list(
                &global.output,
                &rates,
                |r| RateRow::new(r, fees),
                |r| r.vehicle_type.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RatesCommand::Set { vehicle_type, rate } => {
            let hourly_rate = util::parse_amount(&rate, "rate")?;
            let rate = desk.set_rate(&vehicle_type, hourly_rate).await?;
            util::note(
                global.quiet,
                &format!(
                    "{} now pays {}/h",
                    rate.vehicle_type,
                    fees.format_currency(rate.hourly_rate)
                ),
            );
            Ok(())
        }

        RatesCommand::Delete { vehicle_type } => {
            if !util::confirm(
                &format!("Delete the rate for '{vehicle_type}'?"),
                "rates delete",
                global.yes,
            )? {
                return Ok(());
            }
            let rate = desk.delete_rate(&vehicle_type).await?;
            util::note(
                global.quiet,
                &format!(
                    "Rate for {} deleted; it now pays the default {}/h",
                    rate.vehicle_type,
                    fees.format_currency(fees.policy().default_hourly_rate)
                ),
            );
            Ok(())
        }
    }
}

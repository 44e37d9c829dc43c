//! Monthly pass command handlers.

use chrono::Utc;
use tabled::Tabled;

use parkdesk_core::{Desk, MonthlyPass, NewPass, PassDuration, PassView, UpdatePass};

use crate::cli::{GlobalOpts, PassesArgs, PassesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PassRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl PassRow {
    fn new(view: &PassView, color: bool) -> Self {
        let p = &view.pass;
        Self {
            id: p.id.to_string(),
            customer: p.customer_name.clone(),
            vehicle: p.vehicle_number.to_string(),
            phone: p.phone.clone().unwrap_or_default(),
            start: p.start_date.date_naive().to_string(),
            end: p.end_date.date_naive().to_string(),
            status: output::pass_status(view.display_status, color),
        }
    }
}

fn detail(pass: &MonthlyPass) -> String {
    output::detail_block(&[
        ("ID", pass.id.to_string()),
        ("Customer", pass.customer_name.clone()),
        ("Vehicle", pass.vehicle_number.to_string()),
        ("Phone", pass.phone.clone().unwrap_or_else(|| "-".into())),
        ("Start", pass.start_date.date_naive().to_string()),
        ("End", pass.end_date.date_naive().to_string()),
        ("Status", pass.status.to_string()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &Desk, args: PassesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PassesCommand::List => {
            let color = output::should_color(&global.color);
            let views = desk.passes(Utc::now()).await?;
            let out = output::render_list(
                &global.output,
                &views,
                |v| PassRow::new(v, color),
                |v| v.pass.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassesCommand::Create {
            name,
            vehicle,
            phone,
            months,
            start,
        } => {
            let duration = PassDuration::try_from(months).map_err(|reason| CliError::Validation {
                field: "months".into(),
                reason,
            })?;
            let start_date = match start {
                Some(ref raw) => util::parse_date(raw, "start")?,
                None => Utc::now(),
            };

            let pass = desk
                .create_pass(NewPass {
                    customer_name: name,
                    vehicle_number: vehicle,
                    phone,
                    start_date,
                    duration,
                })
                .await?;
            let out = output::render_single(&global.output, &pass, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassesCommand::Update {
            id,
            name,
            vehicle,
            phone,
        } => {
            let id = util::parse_id(&id, "pass")?;
            let update = UpdatePass {
                customer_name: name,
                vehicle_number: vehicle,
                phone,
            };
            let pass = desk.update_pass(id, update).await?;
            let out = output::render_single(&global.output, &pass, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassesCommand::Revoke { id } => {
            let id = util::parse_id(&id, "pass")?;
            if !util::confirm(
                &format!("Revoke pass {id}? The vehicle will be charged from now on."),
                "passes revoke",
                global.yes,
            )? {
                return Ok(());
            }
            let pass = desk.revoke_pass(id).await?;
            util::note(
                global.quiet,
                &format!("Pass for {} ({}) revoked", pass.customer_name, pass.vehicle_number),
            );
            Ok(())
        }
    }
}

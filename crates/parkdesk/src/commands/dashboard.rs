//! Facility overview.

use chrono::Utc;

use parkdesk_core::{DashboardSummary, Desk};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(desk: &Desk, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = desk.dashboard(Utc::now()).await?;
    let fees = desk.fees();

    let out = output::render_single(
        &global.output,
        &summary,
        |s: &DashboardSummary| {
            let (occupied, total) = (s.occupied_slots, s.total_slots);
            output::detail_block(&[
                ("Slots", format!("{occupied} occupied / {total} total")),
                ("Active tickets", s.active_tickets.to_string()),
                ("Overdue tickets", s.overdue_tickets.to_string()),
                ("Active passes", s.active_passes.to_string()),
                ("Revenue", fees.format_currency(s.revenue)),
            ])
        },
        |s| s.revenue.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Slot command handlers.

use tabled::Tabled;

use parkdesk_core::{Desk, ParkingSlot};

use crate::cli::{GlobalOpts, SlotsArgs, SlotsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    number: String,
    #[tabled(rename = "State")]
    state: &'static str,
}

impl From<&ParkingSlot> for SlotRow {
    fn from(s: &ParkingSlot) -> Self {
        Self {
            number: s.slot_number.clone(),
            state: if s.is_occupied { "occupied" } else { "free" },
        }
    }
}

pub async fn handle(desk: &Desk, args: SlotsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SlotsCommand::List { free } => {
            let mut slots = desk.slots().await?;
            if free {
                slots.retain(|s| !s.is_occupied);
            }
            let out = output::render_list(
                &global.output,
                &slots,
                |s| SlotRow::from(s),
                |s| s.slot_number.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

//! Command dispatch: bridges CLI args -> desk operations -> output formatting.

pub mod config_cmd;
pub mod dashboard;
pub mod passes;
pub mod quote;
pub mod rates;
pub mod slots;
pub mod tickets;
pub mod util;

use parkdesk_core::Desk;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, desk: &Desk, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Quote(args) => quote::handle(desk, args, global).await,
        Command::Tickets(args) => tickets::handle(desk, args, global).await,
        Command::Passes(args) => passes::handle(desk, args, global).await,
        Command::Rates(args) => rates::handle(desk, args, global).await,
        Command::Slots(args) => slots::handle(desk, args, global).await,
        Command::Dashboard => dashboard::handle(desk, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Config {
            message: "command does not use the record store".into(),
        }),
    }
}

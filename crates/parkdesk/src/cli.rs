//! Clap derive structures for the `parkdesk` CLI.
//!
//! Defines the command tree, global flags and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkdesk -- officer desk for a parking facility
#[derive(Debug, Parser)]
#[command(
    name = "parkdesk",
    version,
    about = "Issue parking tickets, collect fines and manage monthly passes",
    long_about = "Officer desk for a parking facility.\n\n\
        Prices tickets from per-vehicle hourly rates, exempts monthly-pass\n\
        holders, fines overstays at checkout and tracks slot occupancy in a\n\
        hosted record store.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "PARKDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Record store URL (overrides profile)
    #[arg(long, short = 'b', env = "PARKDESK_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Record store API key
    #[arg(long, env = "PARKDESK_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PARKDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a ticket without issuing it
    #[command(alias = "q")]
    Quote(QuoteArgs),

    /// Issue, inspect and check out parking tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Manage monthly passes
    #[command(alias = "p")]
    Passes(PassesArgs),

    /// Manage hourly rates per vehicle type
    Rates(RatesArgs),

    /// View parking slots
    Slots(SlotsArgs),

    /// Occupancy, open tickets and collected revenue
    #[command(alias = "dash")]
    Dashboard,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUOTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Vehicle type (Car, Bike, Truck, ...)
    #[arg(long, short = 't')]
    pub vehicle_type: String,

    /// Hours to purchase
    #[arg(long, short = 'H')]
    pub hours: String,

    /// License plate, checked against monthly passes
    #[arg(long)]
    pub plate: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets, newest first
    #[command(alias = "ls")]
    List {
        /// Only show tickets in this state
        #[arg(long, short = 's', default_value = "all", value_enum)]
        status: TicketStatusFilter,
    },

    /// Show one ticket with its current overstay
    Get {
        /// Ticket ID
        id: String,
    },

    /// Issue a ticket and occupy its slot
    Issue {
        /// License plate
        #[arg(long, required = true)]
        plate: String,

        /// Vehicle type (Car, Bike, Truck, ...)
        #[arg(long, short = 't', required = true)]
        vehicle_type: String,

        /// Slot number to occupy
        #[arg(long, required = true)]
        spot: String,

        /// Hours purchased
        #[arg(long, short = 'H', required = true)]
        hours: String,
    },

    /// Quote the amount due, then collect payment and free the slot
    Checkout {
        /// Ticket ID
        id: String,
    },

    /// Delete a ticket (frees the slot if it was still active)
    #[command(alias = "rm")]
    Delete {
        /// Ticket ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TicketStatusFilter {
    All,
    /// Active and within purchased time
    Active,
    Paid,
    /// Active but past purchased time
    Overdue,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PASSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PassesArgs {
    #[command(subcommand)]
    pub command: PassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PassesCommand {
    /// List passes with their current status
    #[command(alias = "ls")]
    List,

    /// Sell a monthly pass
    Create {
        /// Customer name
        #[arg(long, required = true)]
        name: String,

        /// Vehicle license plate
        #[arg(long, required = true)]
        vehicle: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Duration in months (1, 3, 6 or 12)
        #[arg(long, short = 'm', default_value_t = 1)]
        months: u32,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,
    },

    /// Edit customer details of a pass
    Update {
        /// Pass ID
        id: String,

        /// New customer name
        #[arg(long)]
        name: Option<String>,

        /// New vehicle license plate
        #[arg(long)]
        vehicle: Option<String>,

        /// New contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Revoke (delete) a pass
    #[command(alias = "rm")]
    Revoke {
        /// Pass ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RatesCommand {
    /// List hourly rates
    #[command(alias = "ls")]
    List,

    /// Create or replace the hourly rate for a vehicle type
    Set {
        /// Vehicle type
        vehicle_type: String,

        /// Hourly rate
        rate: String,
    },

    /// Delete the rate for a vehicle type (falls back to the default rate)
    #[command(alias = "rm")]
    Delete {
        /// Vehicle type
        vehicle_type: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SLOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SlotsArgs {
    #[command(subcommand)]
    pub command: SlotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SlotsCommand {
    /// List slots and their occupancy
    #[command(alias = "ls")]
    List {
        /// Only show free slots
        #[arg(long)]
        free: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

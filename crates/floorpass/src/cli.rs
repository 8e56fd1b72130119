//! Clap derive structures for the `floorpass` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// floorpass -- book, pay for and check in to workspace bookings
#[derive(Debug, Parser)]
#[command(
    name = "floorpass",
    version,
    about = "Book, pay for and check in to floorpass spaces",
    long_about = "Command-line client for the floorpass booking service.\n\n\
        Customers create bookings and pay for them; venue staff look up\n\
        today's bookings and record check-in, check-out and no-shows.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FLOORPASS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, including the version prefix (overrides profile)
    #[arg(long, env = "FLOORPASS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLOORPASS_OUTPUT",
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
    #[arg(long, env = "FLOORPASS_TIMEOUT", global = true)]
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
    /// Sign in, sign out, show the current user
    Auth(AuthArgs),

    /// Manage your bookings
    #[command(alias = "b")]
    Bookings(BookingsArgs),

    /// Book a space and pay for it in one go
    Checkout(BookingForm),

    /// Venue desk: today's bookings, check-in, check-out, no-show
    #[command(alias = "desk")]
    Staff(StaffArgs),

    /// Quote the price of a booking before making it
    Price(PriceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and keep the session in the system keyring
    Login {
        /// Account email (defaults to the profile's email)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,
}

// ── Bookings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List your bookings
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Results per page
        #[arg(long, short = 'l', default_value = "10")]
        limit: u32,

        /// Only bookings in this status
        #[arg(long, short = 's')]
        status: Option<StatusFilter>,
    },

    /// Show one booking
    Get {
        /// Booking id, or booking code with --code
        id: String,

        /// Look the booking up by its code (e.g. FP12345678)
        #[arg(long)]
        code: bool,
    },

    /// Create a pending booking without paying for it
    Create(BookingForm),

    /// Cancel a booking
    Cancel {
        /// Booking id
        id: String,

        /// Reason recorded with the cancellation
        #[arg(long, short = 'r')]
        reason: Option<String>,
    },

    /// Pay for a pending booking
    Pay {
        /// Booking id
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
    Refunded,
}

/// Everything needed to create a booking.
#[derive(Debug, Args)]
pub struct BookingForm {
    /// Space id
    #[arg(long)]
    pub space: String,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Start time (HH:MM)
    #[arg(long)]
    pub start: String,

    /// End time (HH:MM)
    #[arg(long)]
    pub end: String,

    /// Guest name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Guest email (defaults to the profile's email)
    #[arg(long)]
    pub email: Option<String>,

    /// Guest phone (prompted when omitted)
    #[arg(long)]
    pub phone: Option<String>,

    /// Promo code to apply
    #[arg(long)]
    pub promo: Option<String>,

    /// Note for the venue
    #[arg(long)]
    pub notes: Option<String>,
}

// ── Staff ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StaffArgs {
    #[command(subcommand)]
    pub command: StaffCommand,
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// List today's bookings with a headcount
    Today,

    /// Search today's bookings by code, guest name or email
    Find {
        /// Booking code (as scanned), name or email fragment
        query: String,
    },

    /// Check a guest in
    CheckIn {
        /// Booking code, name or email fragment that matches one booking
        query: String,
    },

    /// Check a guest out
    CheckOut {
        /// Booking code, name or email fragment that matches one booking
        query: String,
    },

    /// Mark a booking as a no-show
    NoShow {
        /// Booking code, name or email fragment that matches one booking
        query: String,
    },
}

// ── Price ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Space id
    #[arg(long)]
    pub space: String,

    /// Start time (HH:MM)
    #[arg(long)]
    pub start: String,

    /// End time (HH:MM)
    #[arg(long)]
    pub end: String,

    /// Promo code to check against the quote
    #[arg(long)]
    pub promo: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

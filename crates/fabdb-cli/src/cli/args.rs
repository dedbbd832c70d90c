//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use crate::output::OutputFormat;

/// Command-line interface for the fabdb.net card database
///
/// Look up cards, print and compare decks, and search the card pool.
/// Signing keys are optional; get them from your fabdb.net account page.
#[derive(Parser, Debug)]
#[command(name = "fabdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Public API key (or set FABDB_API_KEY env var)
    #[arg(short = 'k', long, env = "FABDB_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Secret key paired with the API key (or set FABDB_SECRET_KEY env var)
    #[arg(long, env = "FABDB_SECRET_KEY", global = true, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API root to talk to
    #[arg(long, env = "FABDB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one card
    Show(ShowArgs),

    /// Show a deck
    Deck(DeckArgs),

    /// Search for cards
    Search(SearchArgs),

    /// Compare two decks
    Diff(DiffArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Show command
// ============================================================================

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Card identifier (e.g., WTR167)
    pub id: String,

    /// Show stats, artist and rulings too
    #[arg(short, long)]
    pub long: bool,
}

// ============================================================================
// Deck command
// ============================================================================

#[derive(Args, Debug)]
pub struct DeckArgs {
    /// Deck slug or fabdb.net deck URL
    pub deck: String,
}

// ============================================================================
// Search command
// ============================================================================

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text keywords (e.g., "ninja attack")
    #[arg(long)]
    pub keywords: Option<String>,

    /// Hero class (e.g., ninja, ranger)
    #[arg(long)]
    pub class: Option<String>,

    /// Pitch value 0-3 (repeatable)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub pitch: Vec<u8>,

    /// Resource cost (repeatable)
    #[arg(short, long)]
    pub cost: Vec<u32>,

    /// Rarity code (e.g., C, R, M)
    #[arg(long)]
    pub rarity: Option<String>,

    /// Set code (e.g., WTR, ARC)
    #[arg(long)]
    pub set: Option<String>,

    /// Stop after this many cards
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

// ============================================================================
// Diff command
// ============================================================================

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// First deck (slug or URL)
    pub deck_a: String,

    /// Second deck (slug or URL)
    pub deck_b: String,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (api_key, secret_key, base_url, output_format, page_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

//! fabdb - look up Flesh and Blood cards and decks from the terminal.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fabdb_cli::run().await
}

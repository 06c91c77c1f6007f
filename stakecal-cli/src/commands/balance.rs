use anyhow::Result;
use owo_colors::OwoColorize;
use stakecal_core::ledger::{Ledger, LedgerRead, Session};

use crate::utils::tui::with_spinner;

pub async fn run(session: &Session<Ledger>) -> Result<()> {
    let balance = with_spinner(
        "Fetching balance",
        session.ledger.balance_of(&session.identity),
    )
    .await?;

    println!("Available balance: {} ETH", balance.bold());
    Ok(())
}

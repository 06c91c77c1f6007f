use anyhow::Result;
use owo_colors::OwoColorize;
use stakecal_core::ledger::{Ledger, LedgerWrite, Session};

use crate::render::Render;
use crate::utils::tui::with_spinner;

pub async fn run(session: &Session<Ledger>) -> Result<()> {
    let receipt = with_spinner("Withdrawing", session.ledger.withdraw()).await?;
    println!("{} {}", "Withdrawn".green(), receipt.render());

    super::balance::run(session).await
}

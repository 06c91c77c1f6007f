use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use stakecal_core::calendar::CalendarSettings;
use stakecal_core::ledger::{Ledger, LedgerRead, LedgerWrite, Session};
use stakecal_core::{Ether, Identity};

use crate::render::Render;
use crate::utils::tui::with_spinner;

pub async fn show(session: &Session<Ledger>, owner: Option<&str>) -> Result<()> {
    let owner = match owner {
        Some(raw) => Identity::new(raw)?,
        None => session.identity.clone(),
    };

    let settings = with_spinner("Fetching calendar", session.ledger.calendar_of(&owner)).await?;

    println!("{} {}", owner.to_string().bold(), settings.render());
    Ok(())
}

pub async fn create(session: &Session<Ledger>, stake: &str, call_length: &str) -> Result<()> {
    let settings = parse_settings(stake, call_length)?;
    let receipt = with_spinner(
        "Creating calendar",
        session.ledger.create_calendar(settings),
    )
    .await?;

    println!("{} {}", "Calendar created".green(), receipt.render());
    println!("  {}", settings.render());
    Ok(())
}

pub async fn update(session: &Session<Ledger>, stake: &str, call_length: &str) -> Result<()> {
    let settings = parse_settings(stake, call_length)?;
    let receipt = with_spinner(
        "Updating calendar",
        session.ledger.update_calendar_settings(settings),
    )
    .await?;

    println!("{} {}", "Calendar updated".green(), receipt.render());
    println!("  {}", settings.render());
    Ok(())
}

fn parse_settings(stake: &str, call_length: &str) -> Result<CalendarSettings> {
    let stake = Ether::parse_ether(stake)?;
    if stake.is_zero() {
        anyhow::bail!("Stake must be greater than zero");
    }

    let call_length = humantime::parse_duration(call_length)
        .with_context(|| format!("Could not parse call length: \"{}\"", call_length))?;

    Ok(CalendarSettings::new(stake, call_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_stake_and_call_length() {
        let settings = parse_settings("0.01", "30m").unwrap();
        assert_eq!(settings.stake_amount.wei(), 10_000_000_000_000_000);
        assert_eq!(settings.call_length, 1800);
    }

    #[test]
    fn rejects_zero_stake() {
        let err = parse_settings("0", "30m").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_bad_call_length() {
        let err = parse_settings("0.01", "half an hour").unwrap_err();
        assert!(err.to_string().contains("call length"));
    }
}

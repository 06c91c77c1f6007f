use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use owo_colors::OwoColorize;
use stakecal_core::Identity;
use stakecal_core::ledger::{Ledger, LedgerWrite, Session};

use crate::render::{Render, render_time};
use crate::utils::tui::with_spinner;

pub async fn run(session: &Session<Ledger>, owner: &str, at: &str) -> Result<()> {
    let owner = Identity::new(owner)?;
    let time = parse_when(at)?;

    let receipt = with_spinner(
        "Scheduling appointment",
        session.ledger.book_appointment(&owner, time),
    )
    .await?;

    println!(
        "{} with {} at {} {}",
        "Scheduled".green(),
        owner.short().bold(),
        render_time(&time),
        receipt.render()
    );
    println!();

    super::appointments::show(session).await
}

/// Parse an RFC 3339 timestamp, or failing that a natural language time
/// in the local timezone ("tomorrow 3pm", "next friday at 10:00").
fn parse_when(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = fuzzydate::parse(input)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("\"{}\" is ambiguous or skipped in local time", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rfc3339_is_taken_as_is() {
        let parsed = parse_when("2025-03-20T15:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 20, 13, 0, 0).unwrap());
    }

    #[test]
    fn natural_language_is_in_the_future() {
        let parsed = parse_when("tomorrow").unwrap();
        assert!(parsed > Utc::now());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_when("whenever works").unwrap_err();
        assert!(err.to_string().contains("Could not parse"));
    }
}

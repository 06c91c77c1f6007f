use anyhow::Result;
use owo_colors::OwoColorize;
use stakecal_core::feed::{AppointmentFeed, Refresh};
use stakecal_core::ledger::{Ledger, Session};

use crate::render::render_appointments;
use crate::utils::tui::with_spinner;

pub async fn run(session: Option<&Session<Ledger>>) -> Result<()> {
    let Some(session) = session else {
        println!("{}", "No account connected.".yellow());
        println!(
            "{}",
            "Run `stakecal login <address>` or pass --account to view appointments.".dimmed()
        );
        return Ok(());
    };

    show(session).await
}

/// Reconcile and print the session's appointments.
pub async fn show(session: &Session<Ledger>) -> Result<()> {
    let feed = AppointmentFeed::new();
    let refresh = with_spinner("Fetching appointments", feed.refresh(Some(session))).await?;

    let appointments = match refresh {
        Refresh::Applied(appointments) => appointments,
        Refresh::Stale => feed.appointments(),
    };

    println!("{}", render_appointments(&appointments, &session.identity));
    Ok(())
}

//! Settling appointments: owner confirmation and scheduler cancellation.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use stakecal_core::ledger::{Ledger, LedgerRead, LedgerWrite, Session};
use stakecal_core::{Appointment, AppointmentId};

use crate::render::Render;
use crate::utils::tui::with_spinner;

async fn fetch(session: &Session<Ledger>, id: AppointmentId) -> Result<Appointment> {
    Ok(with_spinner("Fetching appointment", session.ledger.appointment_by_id(id)).await?)
}

pub async fn confirm(session: &Session<Ledger>, id: u64, attended: bool) -> Result<()> {
    let id = AppointmentId(id);
    let appointment = fetch(session, id).await?;

    if !appointment.actions_for(&session.identity).confirm {
        bail!(
            "Appointment {} can't be confirmed by {}: only the calendar owner can confirm, and only before it is canceled or confirmed",
            id,
            session.identity.short()
        );
    }

    let receipt = with_spinner(
        "Confirming appointment",
        session.ledger.confirm_appointment(id, attended),
    )
    .await?;

    let outcome = if attended { "attended" } else { "no show" };
    println!(
        "{} {} as {} {}",
        "Confirmed".green(),
        id,
        outcome.bold(),
        receipt.render()
    );
    println!();

    super::appointments::show(session).await
}

pub async fn cancel(session: &Session<Ledger>, id: u64) -> Result<()> {
    let id = AppointmentId(id);
    let appointment = fetch(session, id).await?;

    if !appointment.actions_for(&session.identity).cancel {
        bail!(
            "Appointment {} can't be canceled by {}: only the scheduler can cancel, and only before it is canceled or confirmed",
            id,
            session.identity.short()
        );
    }

    let receipt = with_spinner(
        "Canceling appointment",
        session.ledger.cancel_appointment(id),
    )
    .await?;

    println!("{} {} {}", "Canceled".green(), id, receipt.render());
    println!();

    super::appointments::show(session).await
}

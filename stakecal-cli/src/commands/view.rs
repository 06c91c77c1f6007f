use anyhow::Result;
use stakecal_core::AppointmentId;
use stakecal_core::ledger::{Ledger, LedgerRead, Session};

use crate::render::render_appointment_detail;
use crate::utils::tui::with_spinner;

pub async fn run(session: &Session<Ledger>, id: u64) -> Result<()> {
    let appointment = with_spinner(
        "Fetching appointment",
        session.ledger.appointment_by_id(AppointmentId(id)),
    )
    .await?;

    println!("{}", render_appointment_detail(&appointment));
    Ok(())
}

//! TUI rendering for stakecal types.
//!
//! Extension traits that add colored terminal output to stakecal-core
//! types using owo_colors.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use stakecal_core::calendar::CalendarSettings;
use stakecal_core::ledger::protocol::TxReceipt;
use stakecal_core::{Appointment, AppointmentActions, AppointmentStatus, Identity};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for AppointmentStatus {
    fn render(&self) -> String {
        let label = format!("{:<9}", self.to_string());
        match self {
            AppointmentStatus::Canceled => label.dimmed().to_string(),
            AppointmentStatus::Attended => label.green().to_string(),
            AppointmentStatus::NoShow => label.red().to_string(),
            AppointmentStatus::Pending => label.yellow().to_string(),
        }
    }
}

impl Render for CalendarSettings {
    fn render(&self) -> String {
        if !self.is_open() {
            return "No calendar".dimmed().to_string();
        }
        format!(
            "Stake {} ETH, {} calls",
            self.stake_amount.bold(),
            humantime::format_duration(self.call_length())
        )
    }
}

impl Render for TxReceipt {
    fn render(&self) -> String {
        match self.block_number {
            Some(block) => format!("tx {} (block {})", self.tx_hash, block),
            None => format!("tx {}", self.tx_hash),
        }
        .dimmed()
        .to_string()
    }
}

pub fn render_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%a %b %-d %Y %H:%M").to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Commands the viewer can run next for this appointment.
fn render_actions(id: u64, actions: AppointmentActions) -> String {
    let mut hints = Vec::new();
    if actions.confirm {
        hints.push(format!("confirm {id} [--no-show]"));
    }
    if actions.cancel {
        hints.push(format!("cancel {id}"));
    }
    hints.join(", ")
}

/// One line per appointment, with the viewer's available actions.
pub fn render_appointments(appointments: &[Appointment], viewer: &Identity) -> String {
    if appointments.is_empty() {
        return "No appointments found.".dimmed().to_string();
    }

    let mut lines = vec![format!(
        "{:>4}  {:<15}  {:<15}  {:<21}  {:<9}  {}",
        "ID", "Owner", "Scheduler", "Time", "Status", "Stake"
    )
    .bold()
    .to_string()];

    for appt in appointments {
        let mut line = format!(
            "{:>4}  {:<15}  {:<15}  {:<21}  {}  {} ETH",
            appt.id,
            appt.owner.short(),
            appt.scheduler.short(),
            render_time(&appt.time),
            appt.status().render(),
            appt.amount_staked,
        );

        let actions = appt.actions_for(viewer);
        if !actions.is_empty() {
            line.push_str(&format!("  {}", render_actions(appt.id.0, actions).dimmed()));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Every field of a single appointment.
pub fn render_appointment_detail(appt: &Appointment) -> String {
    [
        format!("{} {}", "Appointment ID:".bold(), appt.id),
        format!("{} {}", "Status:".bold(), appt.status().render().trim_end()),
        format!("{} {}", "Scheduler:".bold(), appt.scheduler),
        format!("{} {}", "Calendar Owner:".bold(), appt.owner),
        format!("{} {}", "Time:".bold(), render_time(&appt.time)),
        format!("{} {} ETH", "Amount Staked:".bold(), appt.amount_staked),
        format!("{} {}", "Attended:".bold(), yes_no(appt.attended)),
        format!("{} {}", "Confirmed By Owner:".bold(), yes_no(appt.confirmed_by_owner)),
        format!("{} {}", "Stake Returned:".bold(), yes_no(appt.stake_returned)),
        format!("{} {}", "Canceled:".bold(), yes_no(appt.canceled)),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use stakecal_core::{AppointmentId, Ether};

    const OWNER: &str = "0x88751b2Be2578825E8b7662d74f63639D0C10222";
    const SCHEDULER: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn appt() -> Appointment {
        Appointment {
            id: AppointmentId(12),
            owner: Identity::new(OWNER).unwrap(),
            scheduler: Identity::new(SCHEDULER).unwrap(),
            time: Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap(),
            amount_staked: Ether::parse_ether("0.05").unwrap(),
            attended: false,
            confirmed_by_owner: false,
            stake_returned: false,
            canceled: false,
        }
    }

    #[test]
    fn empty_list_message() {
        let viewer = Identity::new(OWNER).unwrap();
        assert!(render_appointments(&[], &viewer).contains("No appointments found."));
    }

    #[test]
    fn rows_show_short_identities_status_and_stake() {
        let viewer = Identity::new(SCHEDULER).unwrap();
        let out = render_appointments(&[appt()], &viewer);

        assert!(out.contains("0x8875...C10222"));
        assert!(out.contains("0x1234...345678"));
        assert!(out.contains("Pending"));
        assert!(out.contains("0.05 ETH"));
        assert!(out.contains("cancel 12"));
        assert!(!out.contains("confirm 12"));
    }

    #[test]
    fn owner_sees_confirm_hint() {
        let viewer = Identity::new(OWNER.to_lowercase()).unwrap();
        let out = render_appointments(&[appt()], &viewer);
        assert!(out.contains("confirm 12 [--no-show]"));
    }

    #[test]
    fn action_hints() {
        assert_eq!(
            render_actions(3, AppointmentActions { confirm: true, cancel: true }),
            "confirm 3 [--no-show], cancel 3"
        );
        assert_eq!(render_actions(3, AppointmentActions::default()), "");
    }

    #[test]
    fn detail_lists_every_flag() {
        let mut settled = appt();
        settled.confirmed_by_owner = true;
        settled.attended = true;
        let out = render_appointment_detail(&settled);

        assert!(out.contains("Attended"));
        assert!(out.contains(OWNER));
        assert!(out.contains(SCHEDULER));
        assert!(out.contains("0.05 ETH"));
        assert_eq!(out.lines().count(), 10);
    }

    #[test]
    fn receipt_mentions_block_when_known() {
        let receipt = TxReceipt {
            tx_hash: "0xabc".into(),
            block_number: Some(42),
        };
        assert!(receipt.render().contains("tx 0xabc (block 42)"));
    }

    #[test]
    fn closed_calendar_renders_as_missing() {
        assert!(CalendarSettings::default().render().contains("No calendar"));
    }
}

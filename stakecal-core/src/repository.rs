//! Appointment reconciliation.
//!
//! Merges the owner-side and scheduler-side views of the ledger into one
//! deduplicated list, ordered by time.

use std::collections::HashSet;

use futures::future::try_join_all;
use tracing::debug;

use crate::appointment::{Appointment, AppointmentId};
use crate::error::LedgerReadError;
use crate::identity::Identity;
use crate::ledger::LedgerRead;

/// Every appointment that references `identity` as calendar owner or as
/// scheduler, each id once, sorted by `time` then `id`.
///
/// Either the whole list is produced or the first read failure is returned.
pub async fn reconcile<L>(identity: &Identity, ledger: &L) -> Result<Vec<Appointment>, LedgerReadError>
where
    L: LedgerRead + ?Sized,
{
    let mut appointments = Vec::new();

    let calendar = ledger.calendar_of(identity).await?;
    if calendar.is_open() {
        let ids = ledger.owned_appointment_ids(identity).await?;
        merge(&mut appointments, fetch_all(ledger, &ids).await?);
    }
    let owned = appointments.len();

    let ids = ledger.scheduled_appointment_ids(identity).await?;
    merge(&mut appointments, fetch_all(ledger, &ids).await?);

    sort_chronologically(&mut appointments);

    debug!(
        %identity,
        has_calendar = calendar.is_open(),
        owned,
        total = appointments.len(),
        "reconciled appointments"
    );
    Ok(appointments)
}

/// Fetch the records concurrently. The first failure drops the remaining
/// fetches and fails the batch.
async fn fetch_all<L>(ledger: &L, ids: &[AppointmentId]) -> Result<Vec<Appointment>, LedgerReadError>
where
    L: LedgerRead + ?Sized,
{
    try_join_all(ids.iter().map(|&id| fetch_one(ledger, id))).await
}

async fn fetch_one<L>(ledger: &L, id: AppointmentId) -> Result<Appointment, LedgerReadError>
where
    L: LedgerRead + ?Sized,
{
    let appointment = ledger.appointment_by_id(id).await?;
    if appointment.id != id {
        return Err(LedgerReadError::Malformed(format!(
            "requested appointment {id}, ledger returned {}",
            appointment.id
        )));
    }
    Ok(appointment)
}

/// Append `incoming` entries whose id is not present yet. First seen wins,
/// which also collapses duplicate ids within `incoming`.
fn merge(into: &mut Vec<Appointment>, incoming: Vec<Appointment>) {
    let mut seen: HashSet<AppointmentId> = into.iter().map(|a| a.id).collect();
    into.extend(incoming.into_iter().filter(|a| seen.insert(a.id)));
}

/// The ledger does not guarantee unique timestamps, so ties fall back to id.
fn sort_chronologically(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| a.time.cmp(&b.time).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Ether;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn appt(id: u64, hour: u32) -> Appointment {
        Appointment {
            id: AppointmentId(id),
            owner: Identity::new("0xOwner").unwrap(),
            scheduler: Identity::new("0xScheduler").unwrap(),
            time: Utc.with_ymd_and_hms(2025, 3, 20, hour, 0, 0).unwrap(),
            amount_staked: Ether::ZERO,
            attended: false,
            confirmed_by_owner: false,
            stake_returned: false,
            canceled: false,
        }
    }

    fn ids(appointments: &[Appointment]) -> Vec<u64> {
        appointments.iter().map(|a| a.id.0).collect()
    }

    #[test]
    fn merge_keeps_first_seen() {
        let mut first = appt(1, 9);
        first.attended = true;
        let mut list = vec![first];

        merge(&mut list, vec![appt(1, 9), appt(2, 10), appt(2, 10)]);

        assert_eq!(ids(&list), vec![1, 2]);
        assert!(list[0].attended);
    }

    #[test]
    fn sort_breaks_time_ties_by_id() {
        let mut list = vec![appt(5, 12), appt(3, 12), appt(9, 8), appt(1, 15)];
        sort_chronologically(&mut list);
        assert_eq!(ids(&list), vec![9, 3, 5, 1]);
    }
}

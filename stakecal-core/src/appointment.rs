//! Appointment snapshots as read from the ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Ether;
use crate::error::LedgerReadError;
use crate::identity::Identity;
use crate::status::{AppointmentStatus, derive_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub u64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable projection of a ledger appointment at fetch time.
///
/// A fresh value is built on every fetch and replaced wholesale after any
/// write; nothing mutates it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub owner: Identity,
    pub scheduler: Identity,
    pub time: DateTime<Utc>,
    pub amount_staked: Ether,
    pub attended: bool,
    pub confirmed_by_owner: bool,
    pub stake_returned: bool,
    pub canceled: bool,
}

/// What the viewing account may still do with an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppointmentActions {
    /// Owner may attest attendance (attended or no-show).
    pub confirm: bool,
    /// Scheduler may cancel and reclaim the stake.
    pub cancel: bool,
}

impl AppointmentActions {
    pub fn is_empty(&self) -> bool {
        !self.confirm && !self.cancel
    }
}

impl Appointment {
    pub fn status(&self) -> AppointmentStatus {
        derive_status(self)
    }

    /// Still open: neither canceled nor settled by the owner.
    fn is_open(&self) -> bool {
        !self.canceled && !self.confirmed_by_owner
    }

    pub fn actions_for(&self, viewer: &Identity) -> AppointmentActions {
        AppointmentActions {
            confirm: self.is_open() && self.owner.matches(viewer),
            cancel: self.is_open() && self.scheduler.matches(viewer),
        }
    }
}

/// Appointment as it travels over the ledger protocol.
///
/// Every field is required; a record missing any of them fails to
/// deserialize and the read is reported as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: u64,
    pub owner: String,
    pub scheduler: String,
    /// Unix seconds.
    pub time: i64,
    pub amount_staked: Ether,
    pub attended: bool,
    pub confirmed_by_owner: bool,
    pub stake_returned: bool,
    pub canceled: bool,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = LedgerReadError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let malformed = |what: String| LedgerReadError::Malformed(format!("appointment {}: {what}", record.id));

        let owner = Identity::new(record.owner.as_str()).map_err(|e| malformed(e.to_string()))?;
        let scheduler =
            Identity::new(record.scheduler.as_str()).map_err(|e| malformed(e.to_string()))?;
        let time = DateTime::from_timestamp(record.time, 0)
            .ok_or_else(|| malformed(format!("timestamp {} out of range", record.time)))?;

        Ok(Appointment {
            id: AppointmentId(record.id),
            owner,
            scheduler,
            time,
            amount_staked: record.amount_staked,
            attended: record.attended,
            confirmed_by_owner: record.confirmed_by_owner,
            stake_returned: record.stake_returned,
            canceled: record.canceled,
        })
    }
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        AppointmentRecord {
            id: appointment.id.0,
            owner: appointment.owner.to_string(),
            scheduler: appointment.scheduler.to_string(),
            time: appointment.time.timestamp(),
            amount_staked: appointment.amount_staked,
            attended: appointment.attended,
            confirmed_by_owner: appointment.confirmed_by_owner,
            stake_returned: appointment.stake_returned,
            canceled: appointment.canceled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> AppointmentRecord {
        AppointmentRecord {
            id: 7,
            owner: "0xOwner".to_string(),
            scheduler: "0xScheduler".to_string(),
            time: 1_735_000_000,
            amount_staked: Ether::from_wei(10),
            attended: false,
            confirmed_by_owner: false,
            stake_returned: false,
            canceled: false,
        }
    }

    #[test]
    fn record_converts_to_appointment() {
        let appt = Appointment::try_from(record()).unwrap();
        assert_eq!(appt.id, AppointmentId(7));
        assert_eq!(appt.time.timestamp(), 1_735_000_000);
        assert_eq!(appt.owner.as_str(), "0xOwner");
    }

    #[test]
    fn record_with_blank_owner_is_malformed() {
        let mut bad = record();
        bad.owner = String::new();
        let err = Appointment::try_from(bad).unwrap_err();
        assert!(matches!(err, LedgerReadError::Malformed(_)));
    }

    #[test]
    fn record_with_out_of_range_time_is_malformed() {
        let mut bad = record();
        bad.time = i64::MAX;
        assert!(matches!(
            Appointment::try_from(bad),
            Err(LedgerReadError::Malformed(_))
        ));
    }

    #[test]
    fn incomplete_record_fails_to_deserialize() {
        let json = r#"{"id": 1, "owner": "0xA", "scheduler": "0xB", "time": 0}"#;
        assert!(serde_json::from_str::<AppointmentRecord>(json).is_err());
    }

    #[test]
    fn owner_can_confirm_and_scheduler_can_cancel_open_appointments() {
        let appt = Appointment::try_from(record()).unwrap();
        let owner = Identity::new("0xowner").unwrap();
        let scheduler = Identity::new("0xSCHEDULER").unwrap();
        let stranger = Identity::new("0xStranger").unwrap();

        assert_eq!(
            appt.actions_for(&owner),
            AppointmentActions { confirm: true, cancel: false }
        );
        assert_eq!(
            appt.actions_for(&scheduler),
            AppointmentActions { confirm: false, cancel: true }
        );
        assert!(appt.actions_for(&stranger).is_empty());
    }

    #[test]
    fn settled_appointments_offer_no_actions() {
        let owner = Identity::new("0xOwner").unwrap();

        let mut confirmed = Appointment::try_from(record()).unwrap();
        confirmed.confirmed_by_owner = true;
        assert!(confirmed.actions_for(&owner).is_empty());

        let mut canceled = Appointment::try_from(record()).unwrap();
        canceled.canceled = true;
        assert!(canceled.actions_for(&owner).is_empty());
    }

    #[test]
    fn self_scheduled_appointment_offers_both_actions() {
        let mut appt = Appointment::try_from(record()).unwrap();
        appt.scheduler = appt.owner.clone();
        let me = appt.owner.clone();
        assert_eq!(
            appt.actions_for(&me),
            AppointmentActions { confirm: true, cancel: true }
        );
    }
}

//! Display status derived from an appointment's ledger flags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Canceled,
    Attended,
    NoShow,
    Pending,
}

/// Map the ledger flags to a single display state.
///
/// Cancellation overrides any attendance determination, and `attended`
/// only counts once the owner has confirmed. Conflicting flags never fail.
pub fn derive_status(appointment: &Appointment) -> AppointmentStatus {
    if appointment.canceled {
        AppointmentStatus::Canceled
    } else if appointment.confirmed_by_owner {
        if appointment.attended {
            AppointmentStatus::Attended
        } else {
            AppointmentStatus::NoShow
        }
    } else {
        AppointmentStatus::Pending
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Canceled => "Canceled",
            AppointmentStatus::Attended => "Attended",
            AppointmentStatus::NoShow => "No Show",
            AppointmentStatus::Pending => "Pending",
        };
        f.write_str(label)
    }
}

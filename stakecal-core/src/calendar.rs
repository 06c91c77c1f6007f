//! Per-owner calendar settings as configured on the ledger.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::amount::Ether;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Stake a scheduler must lock to book an appointment.
    pub stake_amount: Ether,
    /// Call length in seconds.
    pub call_length: u64,
}

impl CalendarSettings {
    pub fn new(stake_amount: Ether, call_length: Duration) -> Self {
        CalendarSettings {
            stake_amount,
            call_length: call_length.as_secs(),
        }
    }

    /// An account only has a calendar once it has configured a non-zero stake.
    pub fn is_open(&self) -> bool {
        !self.stake_amount.is_zero()
    }

    pub fn call_length(&self) -> Duration {
        Duration::from_secs(self.call_length)
    }
}

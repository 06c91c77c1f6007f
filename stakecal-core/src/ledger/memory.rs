//! In-process ledger for tests and demos.
//!
//! Reads are served from a [`LedgerSnapshot`]. Writes are recorded, not
//! applied: the ledger's own state rules live in the contract, so callers
//! assert on [`MemoryLedger::submitted`] instead.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Ether;
use crate::appointment::{Appointment, AppointmentId, AppointmentRecord};
use crate::calendar::CalendarSettings;
use crate::error::{LedgerReadError, StakeCalResult};
use crate::identity::Identity;
use crate::ledger::protocol::TxReceipt;
use crate::ledger::{LedgerRead, LedgerWrite};

/// Serializable picture of ledger state, keyed by raw identity strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default)]
    pub calendars: HashMap<String, CalendarSettings>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
    #[serde(default)]
    pub balances: HashMap<String, Ether>,
}

fn same_account(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl LedgerSnapshot {
    pub fn calendar_of(&self, identity: &str) -> CalendarSettings {
        self.calendars
            .iter()
            .find(|(owner, _)| same_account(owner, identity))
            .map(|(_, settings)| *settings)
            .unwrap_or_default()
    }

    pub fn owned_ids(&self, identity: &str) -> Vec<u64> {
        self.appointments
            .iter()
            .filter(|r| same_account(&r.owner, identity))
            .map(|r| r.id)
            .collect()
    }

    pub fn scheduled_ids(&self, identity: &str) -> Vec<u64> {
        self.appointments
            .iter()
            .filter(|r| same_account(&r.scheduler, identity))
            .map(|r| r.id)
            .collect()
    }

    pub fn record(&self, id: u64) -> Option<&AppointmentRecord> {
        self.appointments.iter().find(|r| r.id == id)
    }

    pub fn balance_of(&self, identity: &str) -> Ether {
        self.balances
            .iter()
            .find(|(holder, _)| same_account(holder, identity))
            .map(|(_, balance)| *balance)
            .unwrap_or_default()
    }
}

/// A write captured by [`MemoryLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedTx {
    CreateCalendar(CalendarSettings),
    UpdateCalendarSettings(CalendarSettings),
    ScheduleAppointment {
        owner: Identity,
        time: DateTime<Utc>,
        stake: Ether,
    },
    ConfirmAppointment {
        id: AppointmentId,
        attended: bool,
    },
    CancelAppointment(AppointmentId),
    Withdraw,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    snapshot: LedgerSnapshot,
    failing: HashSet<u64>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    record_fetches: AtomicUsize,
    submitted: Mutex<Vec<SubmittedTx>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        MemoryLedger {
            snapshot,
            ..Self::default()
        }
    }

    pub fn with_calendar(mut self, owner: &str, settings: CalendarSettings) -> Self {
        self.snapshot.calendars.insert(owner.to_string(), settings);
        self
    }

    pub fn with_appointment(mut self, appointment: &Appointment) -> Self {
        self.snapshot.appointments.push(appointment.into());
        self
    }

    /// Store a raw record as-is, including ones that will not convert.
    pub fn with_record(mut self, record: AppointmentRecord) -> Self {
        self.snapshot.appointments.push(record);
        self
    }

    pub fn with_balance(mut self, holder: &str, balance: Ether) -> Self {
        self.snapshot.balances.insert(holder.to_string(), balance);
        self
    }

    /// Make every fetch of `id` fail.
    pub fn failing_on(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    /// Delay every record fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    /// Highest number of record fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn record_fetches(&self) -> usize {
        self.record_fetches.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.submitted
            .lock()
            .map(|txs| txs.clone())
            .unwrap_or_default()
    }

    fn submit(&self, tx: SubmittedTx) -> StakeCalResult<TxReceipt> {
        let mut txs = self
            .submitted
            .lock()
            .map_err(|_| crate::error::StakeCalError::LedgerWrite("ledger poisoned".into()))?;
        txs.push(tx);
        Ok(TxReceipt {
            tx_hash: format!("0x{:064x}", txs.len()),
            block_number: Some(txs.len() as u64),
        })
    }

    async fn fetch(&self, id: AppointmentId) -> Result<Appointment, LedgerReadError> {
        let guard = InFlight::enter(&self.in_flight);
        self.max_in_flight.fetch_max(guard.now, Ordering::SeqCst);
        self.record_fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        drop(guard);

        if self.failing.contains(&id.0) {
            return Err(LedgerReadError::Provider(format!(
                "execution reverted: appointment {id}"
            )));
        }

        let record = self
            .snapshot
            .record(id.0)
            .cloned()
            .ok_or_else(|| LedgerReadError::Provider(format!("appointment {id} does not exist")))?;
        Appointment::try_from(record)
    }
}

/// Marks a fetch in flight until dropped, including when the fetch is
/// cancelled mid-sleep.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
    now: usize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        InFlight { counter, now }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerRead for MemoryLedger {
    async fn calendar_of(&self, identity: &Identity) -> Result<CalendarSettings, LedgerReadError> {
        Ok(self.snapshot.calendar_of(identity.as_str()))
    }

    async fn owned_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError> {
        Ok(self
            .snapshot
            .owned_ids(identity.as_str())
            .into_iter()
            .map(AppointmentId)
            .collect())
    }

    async fn scheduled_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError> {
        Ok(self
            .snapshot
            .scheduled_ids(identity.as_str())
            .into_iter()
            .map(AppointmentId)
            .collect())
    }

    async fn appointment_by_id(&self, id: AppointmentId) -> Result<Appointment, LedgerReadError> {
        self.fetch(id).await
    }

    async fn balance_of(&self, identity: &Identity) -> Result<Ether, LedgerReadError> {
        Ok(self.snapshot.balance_of(identity.as_str()))
    }
}

#[async_trait]
impl LedgerWrite for MemoryLedger {
    async fn create_calendar(&self, settings: CalendarSettings) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::CreateCalendar(settings))
    }

    async fn update_calendar_settings(
        &self,
        settings: CalendarSettings,
    ) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::UpdateCalendarSettings(settings))
    }

    async fn schedule_appointment(
        &self,
        owner: &Identity,
        time: DateTime<Utc>,
        stake: Ether,
    ) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::ScheduleAppointment {
            owner: owner.clone(),
            time,
            stake,
        })
    }

    async fn confirm_appointment(
        &self,
        id: AppointmentId,
        attended: bool,
    ) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::ConfirmAppointment { id, attended })
    }

    async fn cancel_appointment(&self, id: AppointmentId) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::CancelAppointment(id))
    }

    async fn withdraw(&self) -> StakeCalResult<TxReceipt> {
        self.submit(SubmittedTx::Withdraw)
    }
}

//! Access to the scheduling ledger.
//!
//! `LedgerRead` and `LedgerWrite` are the seams the rest of stakecal is
//! written against. [`Ledger`] implements both by talking to a provider
//! binary; [`memory::MemoryLedger`] is an in-process stand-in for tests.

pub mod memory;
pub mod protocol;
pub mod provider;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::amount::Ether;
use crate::appointment::{Appointment, AppointmentId};
use crate::calendar::CalendarSettings;
use crate::error::{LedgerReadError, StakeCalError, StakeCalResult};
use crate::identity::Identity;
use crate::ledger::protocol::{
    Account, AppointmentById, BalanceOf, CalendarOf, CancelAppointment, ConfirmAppointment,
    CreateCalendar, OwnedAppointmentIds, ProviderParams, ScheduleAppointment,
    ScheduledAppointmentIds, TxReceipt, UpdateCalendarSettings, Withdraw,
};
use crate::ledger::provider::Provider;

/// Idempotent, side-effect-free ledger queries.
#[async_trait]
pub trait LedgerRead: Send + Sync {
    async fn calendar_of(&self, identity: &Identity) -> Result<CalendarSettings, LedgerReadError>;

    async fn owned_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError>;

    async fn scheduled_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError>;

    async fn appointment_by_id(&self, id: AppointmentId) -> Result<Appointment, LedgerReadError>;

    async fn balance_of(&self, identity: &Identity) -> Result<Ether, LedgerReadError>;
}

/// Transactions signed by the connected account. Each call returns once the
/// transaction is confirmed.
#[async_trait]
pub trait LedgerWrite: LedgerRead {
    async fn create_calendar(&self, settings: CalendarSettings) -> StakeCalResult<TxReceipt>;

    async fn update_calendar_settings(
        &self,
        settings: CalendarSettings,
    ) -> StakeCalResult<TxReceipt>;

    async fn schedule_appointment(
        &self,
        owner: &Identity,
        time: DateTime<Utc>,
        stake: Ether,
    ) -> StakeCalResult<TxReceipt>;

    async fn confirm_appointment(
        &self,
        id: AppointmentId,
        attended: bool,
    ) -> StakeCalResult<TxReceipt>;

    async fn cancel_appointment(&self, id: AppointmentId) -> StakeCalResult<TxReceipt>;

    async fn withdraw(&self) -> StakeCalResult<TxReceipt>;

    /// Book on `owner`'s calendar, staking exactly what the calendar asks for.
    async fn book_appointment(
        &self,
        owner: &Identity,
        time: DateTime<Utc>,
    ) -> StakeCalResult<TxReceipt> {
        let calendar = self.calendar_of(owner).await?;
        if !calendar.is_open() {
            return Err(StakeCalError::NoCalendar(owner.to_string()));
        }
        debug!(%owner, stake = %calendar.stake_amount, %time, "booking appointment");
        self.schedule_appointment(owner, time, calendar.stake_amount)
            .await
    }
}

/// A connected account together with the ledger it reads from.
#[derive(Debug, Clone)]
pub struct Session<L> {
    pub identity: Identity,
    pub ledger: L,
}

impl<L> Session<L> {
    pub fn new(identity: Identity, ledger: L) -> Self {
        Session { identity, ledger }
    }
}

/// Ledger handle backed by a provider binary.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub provider: Provider,
    params: ProviderParams,
}

impl Ledger {
    pub fn new(provider: Provider, params: ProviderParams) -> Self {
        Ledger { provider, params }
    }

    fn params(&self) -> ProviderParams {
        self.params.clone()
    }

    /// The account the provider signs for.
    pub async fn account(&self) -> Result<Identity, LedgerReadError> {
        let raw = self
            .provider
            .read(Account {
                params: self.params(),
            })
            .await?;
        Identity::new(raw).map_err(|e| LedgerReadError::Malformed(e.to_string()))
    }

    /// Connect as the provider's account unless an identity is given.
    pub async fn connect(self, identity: Option<Identity>) -> Result<Session<Self>, LedgerReadError> {
        let identity = match identity {
            Some(identity) => identity,
            None => self.account().await?,
        };
        Ok(Session::new(identity, self))
    }
}

fn into_ids(raw: Vec<u64>) -> Vec<AppointmentId> {
    raw.into_iter().map(AppointmentId).collect()
}

fn write_failed(e: LedgerReadError) -> StakeCalError {
    StakeCalError::LedgerWrite(e.to_string())
}

#[async_trait]
impl LedgerRead for Ledger {
    async fn calendar_of(&self, identity: &Identity) -> Result<CalendarSettings, LedgerReadError> {
        self.provider
            .read(CalendarOf {
                params: self.params(),
                identity: identity.to_string(),
            })
            .await
    }

    async fn owned_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError> {
        self.provider
            .read(OwnedAppointmentIds {
                params: self.params(),
                identity: identity.to_string(),
            })
            .await
            .map(into_ids)
    }

    async fn scheduled_appointment_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<AppointmentId>, LedgerReadError> {
        self.provider
            .read(ScheduledAppointmentIds {
                params: self.params(),
                identity: identity.to_string(),
            })
            .await
            .map(into_ids)
    }

    async fn appointment_by_id(&self, id: AppointmentId) -> Result<Appointment, LedgerReadError> {
        let record = self
            .provider
            .read(AppointmentById {
                params: self.params(),
                appointment_id: id.0,
            })
            .await?;
        Appointment::try_from(record)
    }

    async fn balance_of(&self, identity: &Identity) -> Result<Ether, LedgerReadError> {
        self.provider
            .read(BalanceOf {
                params: self.params(),
                identity: identity.to_string(),
            })
            .await
    }
}

#[async_trait]
impl LedgerWrite for Ledger {
    async fn create_calendar(&self, settings: CalendarSettings) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(CreateCalendar {
                params: self.params(),
                settings,
            })
            .await
            .map_err(write_failed)
    }

    async fn update_calendar_settings(
        &self,
        settings: CalendarSettings,
    ) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(UpdateCalendarSettings {
                params: self.params(),
                settings,
            })
            .await
            .map_err(write_failed)
    }

    async fn schedule_appointment(
        &self,
        owner: &Identity,
        time: DateTime<Utc>,
        stake: Ether,
    ) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(ScheduleAppointment::at(
                self.params(),
                owner.to_string(),
                time,
                stake,
            ))
            .await
            .map_err(write_failed)
    }

    async fn confirm_appointment(
        &self,
        id: AppointmentId,
        attended: bool,
    ) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(ConfirmAppointment {
                params: self.params(),
                appointment_id: id.0,
                attended,
            })
            .await
            .map_err(write_failed)
    }

    async fn cancel_appointment(&self, id: AppointmentId) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(CancelAppointment {
                params: self.params(),
                appointment_id: id.0,
            })
            .await
            .map_err(write_failed)
    }

    async fn withdraw(&self) -> StakeCalResult<TxReceipt> {
        self.provider
            .write(Withdraw {
                params: self.params(),
            })
            .await
            .map_err(write_failed)
    }
}

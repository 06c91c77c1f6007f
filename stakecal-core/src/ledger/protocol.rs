//! Defines the JSON protocol used between stakecal and ledger provider
//! binaries over stdin/stdout.
//!
//! Providers own the chain specifics (RPC endpoint, contract ABI, signer).
//! Every request carries the provider-specific params from the ledger
//! config flattened next to the command's own fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::amount::Ether;
use crate::appointment::AppointmentRecord;
use crate::calendar::CalendarSettings;

pub type ProviderParams = serde_json::Map<String, serde_json::Value>;

pub trait LedgerCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Account,
    CalendarOf,
    OwnedAppointmentIds,
    ScheduledAppointmentIds,
    AppointmentById,
    BalanceOf,
    CreateCalendar,
    UpdateCalendarSettings,
    ScheduleAppointment,
    ConfirmAppointment,
    CancelAppointment,
    Withdraw,
}

impl Command {
    /// Writes submit a transaction and wait for it to be mined.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::CreateCalendar
                | Command::UpdateCalendarSettings
                | Command::ScheduleAppointment
                | Command::ConfirmAppointment
                | Command::CancelAppointment
                | Command::Withdraw
        )
    }
}

/// Request sent from stakecal to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to stakecal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data })
            .unwrap_or_else(|e| Response::error(&format!("Failed to encode response: {e}")))
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        let response = Response::<()>::Error {
            error: msg.to_string(),
        };
        // A struct of one String always serializes.
        serde_json::to_string(&response).unwrap_or_default()
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

// ============================================================================
// Reads
// ============================================================================

/// The signing account the provider is connected as.
#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub params: ProviderParams,
}

impl LedgerCommand for Account {
    type Response = String;
    fn command() -> Command {
        Command::Account
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarOf {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub identity: String,
}

impl LedgerCommand for CalendarOf {
    type Response = CalendarSettings;
    fn command() -> Command {
        Command::CalendarOf
    }
}

/// Appointments booked against `identity`'s calendar.
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnedAppointmentIds {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub identity: String,
}

impl LedgerCommand for OwnedAppointmentIds {
    type Response = Vec<u64>;
    fn command() -> Command {
        Command::OwnedAppointmentIds
    }
}

/// Appointments `identity` booked on any calendar.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduledAppointmentIds {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub identity: String,
}

impl LedgerCommand for ScheduledAppointmentIds {
    type Response = Vec<u64>;
    fn command() -> Command {
        Command::ScheduledAppointmentIds
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentById {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub appointment_id: u64,
}

impl LedgerCommand for AppointmentById {
    type Response = AppointmentRecord;
    fn command() -> Command {
        Command::AppointmentById
    }
}

/// Withdrawable balance held by the ledger for `identity`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceOf {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub identity: String,
}

impl LedgerCommand for BalanceOf {
    type Response = Ether;
    fn command() -> Command {
        Command::BalanceOf
    }
}

// ============================================================================
// Writes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCalendar {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub settings: CalendarSettings,
}

impl LedgerCommand for CreateCalendar {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::CreateCalendar
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCalendarSettings {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub settings: CalendarSettings,
}

impl LedgerCommand for UpdateCalendarSettings {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::UpdateCalendarSettings
    }
}

/// Book an appointment, attaching `stake` as the transaction value.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleAppointment {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub owner: String,
    /// Unix seconds.
    pub time: i64,
    pub stake: Ether,
}

impl ScheduleAppointment {
    pub fn at(params: ProviderParams, owner: String, time: DateTime<Utc>, stake: Ether) -> Self {
        ScheduleAppointment {
            params,
            owner,
            time: time.timestamp(),
            stake,
        }
    }
}

impl LedgerCommand for ScheduleAppointment {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::ScheduleAppointment
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmAppointment {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub appointment_id: u64,
    pub attended: bool,
}

impl LedgerCommand for ConfirmAppointment {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::ConfirmAppointment
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelAppointment {
    #[serde(flatten)]
    pub params: ProviderParams,
    pub appointment_id: u64,
}

impl LedgerCommand for CancelAppointment {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::CancelAppointment
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Withdraw {
    #[serde(flatten)]
    pub params: ProviderParams,
}

impl LedgerCommand for Withdraw {
    type Response = TxReceipt;
    fn command() -> Command {
        Command::Withdraw
    }
}

//! stakecal-provider-fixture - read-only ledger provider for stakecal
//!
//! This binary implements the stakecal ledger protocol, communicating
//! with stakecal via JSON over stdin/stdout. Instead of a chain it serves
//! a JSON snapshot named by the `fixture_path` ledger param:
//!
//!   [ledger]
//!   provider = "fixture"
//!   fixture_path = "~/stakecal-fixture.json"
//!
//! Transactions are rejected: a snapshot has no state rules to apply them.

mod fixture;

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use stakecal_core::ledger::memory::LedgerSnapshot;
use stakecal_core::ledger::protocol::{
    Account, AppointmentById, BalanceOf, CalendarOf, Command, OwnedAppointmentIds, ProviderParams,
    Request, Response, ScheduledAppointmentIds,
};

#[tokio::main]
async fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e)),
        };

        if writeln!(stdout, "{}", response).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

async fn handle_request(request: Request) -> String {
    if request.command.is_write() {
        return Response::error(&format!(
            "{:?} rejected: the fixture ledger is read-only",
            request.command
        ));
    }

    match request.command {
        Command::Account => handle_account(request.params),
        Command::CalendarOf => handle_calendar_of(request.params),
        Command::OwnedAppointmentIds => handle_owned_appointment_ids(request.params),
        Command::ScheduledAppointmentIds => handle_scheduled_appointment_ids(request.params),
        Command::AppointmentById => handle_appointment_by_id(request.params),
        Command::BalanceOf => handle_balance_of(request.params),
        other => Response::error(&format!("Unsupported command: {:?}", other)),
    }
}

fn parse<P: DeserializeOwned>(params: serde_json::Value) -> Result<P, String> {
    serde_json::from_value(params).map_err(|e| Response::error(&format!("Invalid params: {}", e)))
}

/// Parse the command, load the snapshot its params point at, and answer
/// from it. Provider params are flattened into the command, so the raw
/// params object carries `fixture_path` too.
fn respond<P, T>(
    params: serde_json::Value,
    answer: impl Fn(&P, &LedgerSnapshot) -> anyhow::Result<T>,
) -> String
where
    P: DeserializeOwned,
    T: Serialize,
{
    let (cmd, provider_params) = match parse::<P>(params.clone())
        .and_then(|cmd| parse::<ProviderParams>(params).map(|pp| (cmd, pp)))
    {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    match fixture::load(&provider_params).and_then(|snapshot| answer(&cmd, &snapshot)) {
        Ok(data) => Response::success(data),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

fn handle_account(params: serde_json::Value) -> String {
    respond(
        params,
        |_: &Account, snapshot| {
            snapshot
                .account
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Fixture has no 'account' set"))
        },
    )
}

fn handle_calendar_of(params: serde_json::Value) -> String {
    respond(
        params,
        |cmd: &CalendarOf, snapshot| Ok(snapshot.calendar_of(&cmd.identity)),
    )
}

fn handle_owned_appointment_ids(params: serde_json::Value) -> String {
    respond(
        params,
        |cmd: &OwnedAppointmentIds, snapshot| Ok(snapshot.owned_ids(&cmd.identity)),
    )
}

fn handle_scheduled_appointment_ids(params: serde_json::Value) -> String {
    respond(
        params,
        |cmd: &ScheduledAppointmentIds, snapshot| Ok(snapshot.scheduled_ids(&cmd.identity)),
    )
}

fn handle_appointment_by_id(params: serde_json::Value) -> String {
    respond(
        params,
        |cmd: &AppointmentById, snapshot| {
            snapshot
                .record(cmd.appointment_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Appointment {} does not exist", cmd.appointment_id))
        },
    )
}

fn handle_balance_of(params: serde_json::Value) -> String {
    respond(
        params,
        |cmd: &BalanceOf, snapshot| Ok(snapshot.balance_of(&cmd.identity)),
    )
}

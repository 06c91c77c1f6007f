//! Drives the built provider binary through the core ledger client.

use pretty_assertions::assert_eq;
use serde_json::json;
use stakecal_core::appointment::AppointmentRecord;
use stakecal_core::ledger::memory::LedgerSnapshot;
use stakecal_core::ledger::protocol::ProviderParams;
use stakecal_core::ledger::provider::Provider;
use stakecal_core::ledger::{Ledger, LedgerRead, LedgerWrite};
use stakecal_core::{AppointmentId, AppointmentStatus, Ether, Identity, StakeCalError, reconcile};
use tempfile::TempDir;

const ALICE: &str = "0xA11ce00000000000000000000000000000000001";
const BOB: &str = "0xB0b0000000000000000000000000000000000002";

fn record(id: u64, owner: &str, scheduler: &str, time: i64) -> AppointmentRecord {
    AppointmentRecord {
        id,
        owner: owner.to_string(),
        scheduler: scheduler.to_string(),
        time,
        amount_staked: Ether::parse_ether("0.01").unwrap(),
        attended: false,
        confirmed_by_owner: false,
        stake_returned: false,
        canceled: false,
    }
}

fn snapshot() -> LedgerSnapshot {
    let mut attended = record(3, BOB, ALICE, 1_700_000_000);
    attended.confirmed_by_owner = true;
    attended.attended = true;

    let mut snapshot = LedgerSnapshot {
        account: Some(ALICE.to_string()),
        ..LedgerSnapshot::default()
    };
    snapshot.calendars.insert(
        ALICE.to_string(),
        serde_json::from_value(json!({"stake_amount": "10000000000000000", "call_length": 1800}))
            .unwrap(),
    );
    snapshot.appointments = vec![
        record(1, ALICE, BOB, 1_700_000_600),
        record(2, ALICE, ALICE, 1_700_000_600),
        attended,
    ];
    snapshot
        .balances
        .insert(ALICE.to_string(), Ether::parse_ether("0.03").unwrap());
    snapshot
}

fn ledger_for(snapshot: &LedgerSnapshot) -> (TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.json");
    std::fs::write(&path, serde_json::to_string_pretty(snapshot).unwrap()).unwrap();

    let mut params = ProviderParams::new();
    params.insert("fixture_path".into(), json!(path.to_string_lossy()));
    params.insert("chain_id".into(), json!(11155111));

    let provider = Provider::at_path("fixture", env!("CARGO_BIN_EXE_stakecal-provider-fixture"));
    (dir, Ledger::new(provider, params))
}

#[tokio::test]
async fn reconciles_through_the_provider() {
    let (_dir, ledger) = ledger_for(&snapshot());
    let session = ledger.connect(None).await.unwrap();
    assert_eq!(session.identity.as_str(), ALICE);

    let appointments = reconcile(&session.identity, &session.ledger).await.unwrap();

    let ids: Vec<u64> = appointments.iter().map(|a| a.id.0).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(appointments[0].status(), AppointmentStatus::Attended);
    assert_eq!(appointments[1].amount_staked.to_string(), "0.01");
}

#[tokio::test]
async fn serves_calendar_and_balance() {
    let (_dir, ledger) = ledger_for(&snapshot());
    let alice = Identity::new(ALICE).unwrap();
    let bob = Identity::new(BOB).unwrap();

    let calendar = ledger.calendar_of(&alice).await.unwrap();
    assert!(calendar.is_open());
    assert_eq!(calendar.call_length, 1800);
    assert!(!ledger.calendar_of(&bob).await.unwrap().is_open());

    assert_eq!(ledger.balance_of(&alice).await.unwrap().to_string(), "0.03");
    assert_eq!(ledger.balance_of(&bob).await.unwrap(), Ether::ZERO);
}

#[tokio::test]
async fn unknown_appointment_is_a_read_error() {
    let (_dir, ledger) = ledger_for(&snapshot());

    let err = ledger.appointment_by_id(AppointmentId(99)).await.unwrap_err();

    assert!(err.to_string().contains("Appointment 99 does not exist"), "{err}");
}

#[tokio::test]
async fn transactions_are_rejected() {
    let (_dir, ledger) = ledger_for(&snapshot());

    let err = ledger.withdraw().await.unwrap_err();

    assert!(matches!(err, StakeCalError::LedgerWrite(ref msg) if msg.contains("read-only")));
}

#[tokio::test]
async fn missing_fixture_path_is_reported() {
    let provider = Provider::at_path("fixture", env!("CARGO_BIN_EXE_stakecal-provider-fixture"));
    let ledger = Ledger::new(provider, ProviderParams::new());

    let err = ledger.account().await.unwrap_err();

    assert!(err.to_string().contains("fixture_path"), "{err}");
}

//! The appointment list a presentation caller shows.
//!
//! Each refresh runs under a new generation and cancellation token. A run
//! that is superseded before it finishes is dropped and never touches the
//! applied list, whether it succeeded or failed.

use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::appointment::Appointment;
use crate::error::LedgerReadError;
use crate::ledger::{LedgerRead, Session};
use crate::repository::reconcile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The list was reconciled and is now the feed's current state.
    Applied(Vec<Appointment>),
    /// A newer refresh started first; this result was discarded.
    Stale,
}

#[derive(Debug, Default)]
struct FeedState {
    generation: u64,
    token: CancellationToken,
    appointments: Vec<Appointment>,
}

#[derive(Debug, Default)]
pub struct AppointmentFeed {
    state: Mutex<FeedState>,
}

impl AppointmentFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        // State is replaced wholesale, so a poisoned lock still holds a
        // consistent value.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the currently applied list.
    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock().appointments.clone()
    }

    /// Reconcile for `session` and apply the result unless a later refresh
    /// has started in the meantime. No session means no data: the feed is
    /// cleared.
    pub async fn refresh<L>(&self, session: Option<&Session<L>>) -> Result<Refresh, LedgerReadError>
    where
        L: LedgerRead,
    {
        let (generation, token) = self.begin();

        let Some(session) = session else {
            return Ok(self.apply(generation, Vec::new()));
        };

        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!(generation, "refresh superseded while in flight");
                return Ok(Refresh::Stale);
            }
            result = reconcile(&session.identity, &session.ledger) => result,
        };

        match result {
            Ok(appointments) => Ok(self.apply(generation, appointments)),
            Err(_) if self.is_superseded(generation) => Ok(Refresh::Stale),
            Err(e) => Err(e),
        }
    }

    /// Start a new generation, cancelling whatever is in flight.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut state = self.lock();
        state.token.cancel();
        state.token = CancellationToken::new();
        state.generation += 1;
        (state.generation, state.token.clone())
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.lock().generation != generation
    }

    fn apply(&self, generation: u64, appointments: Vec<Appointment>) -> Refresh {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(generation, current = state.generation, "discarding stale appointments");
            return Refresh::Stale;
        }
        state.appointments = appointments.clone();
        Refresh::Applied(appointments)
    }
}

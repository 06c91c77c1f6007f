//! Core types for the stakecal ecosystem.
//!
//! This crate provides everything shared by the stakecal CLI and ledger
//! providers:
//! - `Appointment` snapshots and their derived display status
//! - `ledger` traits, the provider protocol, and the provider client
//! - `repository::reconcile`, which merges an account's owner-side and
//!   scheduler-side appointments into one ordered list
//! - `feed::AppointmentFeed`, which applies reconciled lists and drops
//!   stale ones

pub mod amount;
pub mod appointment;
pub mod calendar;
pub mod config;
pub mod error;
pub mod feed;
pub mod identity;
pub mod ledger;
pub mod repository;
pub mod status;

pub use amount::Ether;
pub use appointment::{Appointment, AppointmentActions, AppointmentId};
pub use error::{LedgerReadError, StakeCalError, StakeCalResult};
pub use identity::Identity;
pub use repository::reconcile;
pub use status::{AppointmentStatus, derive_status};

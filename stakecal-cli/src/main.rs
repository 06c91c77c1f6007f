mod commands;
mod render;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stakecal_core::Identity;
use stakecal_core::config::StakecalConfig;
use stakecal_core::ledger::{Ledger, Session};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::utils::tui::with_spinner;

#[derive(Parser)]
#[command(name = "stakecal")]
#[command(about = "View and manage staked appointments on the on-chain calendar")]
struct Cli {
    /// View as this account instead of the configured one
    #[arg(long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List appointments on your calendar and the ones you booked (default)
    Appointments,
    /// Show every ledger field of one appointment
    View { id: u64 },
    /// Show your withdrawable balance
    Balance,
    /// Show calendar settings (yours by default)
    Calendar { owner: Option<String> },
    /// Open a calendar others can book against
    CreateCalendar {
        /// Stake schedulers must lock, in ETH (e.g. 0.01)
        #[arg(long)]
        stake: String,

        /// Call length (e.g. "30m", "1h")
        #[arg(long)]
        call_length: String,
    },
    /// Change your calendar's stake and call length
    UpdateCalendar {
        /// Stake schedulers must lock, in ETH (e.g. 0.01)
        #[arg(long)]
        stake: String,

        /// Call length (e.g. "30m", "1h")
        #[arg(long)]
        call_length: String,
    },
    /// Book an appointment on someone's calendar, staking their asking amount
    Schedule {
        /// Calendar owner address
        owner: String,

        /// When (e.g. "2025-03-20T15:00:00Z", "tomorrow 3pm")
        #[arg(long)]
        at: String,
    },
    /// Attest attendance for an appointment on your calendar
    Confirm {
        id: u64,

        /// Record that the scheduler did not show up
        #[arg(long)]
        no_show: bool,
    },
    /// Cancel an appointment you booked
    Cancel { id: u64 },
    /// Withdraw your released stakes
    Withdraw,
    /// Remember an account to view as (defaults to the provider's signer)
    Login { account: Option<String> },
    /// Forget the remembered account
    Logout,
    /// Show config location and ledger settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STAKECAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StakecalConfig::load()?;
    let account = cli.account.as_deref();

    match cli.command.unwrap_or(Commands::Appointments) {
        Commands::Appointments => {
            let session = try_connect(&config, account).await?;
            commands::appointments::run(session.as_ref()).await
        }
        Commands::View { id } => {
            let session = connect(&config, account).await?;
            commands::view::run(&session, id).await
        }
        Commands::Balance => {
            let session = connect(&config, account).await?;
            commands::balance::run(&session).await
        }
        Commands::Calendar { owner } => {
            let session = connect(&config, account).await?;
            commands::calendar::show(&session, owner.as_deref()).await
        }
        Commands::CreateCalendar { stake, call_length } => {
            let session = connect(&config, account).await?;
            commands::calendar::create(&session, &stake, &call_length).await
        }
        Commands::UpdateCalendar { stake, call_length } => {
            let session = connect(&config, account).await?;
            commands::calendar::update(&session, &stake, &call_length).await
        }
        Commands::Schedule { owner, at } => {
            let session = connect(&config, account).await?;
            commands::schedule::run(&session, &owner, &at).await
        }
        Commands::Confirm { id, no_show } => {
            let session = connect(&config, account).await?;
            commands::settle::confirm(&session, id, !no_show).await
        }
        Commands::Cancel { id } => {
            let session = connect(&config, account).await?;
            commands::settle::cancel(&session, id).await
        }
        Commands::Withdraw => {
            let session = connect(&config, account).await?;
            commands::withdraw::run(&session).await
        }
        Commands::Login { account: login_as } => {
            commands::login::login(config, login_as.as_deref().or(account)).await
        }
        Commands::Logout => commands::login::logout(config),
        Commands::Config => commands::config::run(&config),
    }
}

fn requested_identity(config: &StakecalConfig, account: Option<&str>) -> Result<Option<Identity>> {
    match account {
        Some(raw) => Ok(Some(Identity::new(raw)?)),
        None => Ok(config.identity()?),
    }
}

/// Connect, requiring an account.
async fn connect(config: &StakecalConfig, account: Option<&str>) -> Result<Session<Ledger>> {
    let identity = requested_identity(config, account)?;
    let ledger = config.ledger.ledger();

    with_spinner("Connecting", ledger.connect(identity))
        .await
        .context("Could not determine the account to act as. Pass --account or run `stakecal login`")
}

/// Connect if an account is available. Without one there is simply
/// nothing to show.
async fn try_connect(
    config: &StakecalConfig,
    account: Option<&str>,
) -> Result<Option<Session<Ledger>>> {
    let ledger = config.ledger.ledger();

    if let Some(identity) = requested_identity(config, account)? {
        return Ok(Some(Session::new(identity, ledger)));
    }

    let signer = with_spinner("Connecting", ledger.account()).await;
    match signer {
        Ok(identity) => Ok(Some(Session::new(identity, ledger))),
        Err(e) => {
            warn!(error = %e, "provider did not report an account");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stakecal_core::config::LedgerConfig;

    fn config_with_missing_provider() -> StakecalConfig {
        StakecalConfig {
            account: None,
            ledger: LedgerConfig {
                provider: "ghost".into(),
                provider_path: Some("/nonexistent/stakecal-provider-ghost".into()),
                timeout_secs: 5,
                confirm_timeout_secs: 5,
                params: HashMap::new(),
            },
        }
    }

    #[tokio::test]
    async fn connect_failure_keeps_the_provider_error() {
        let err = connect(&config_with_missing_provider(), None)
            .await
            .err()
            .unwrap();
        let message = format!("{err:#}");

        assert!(message.starts_with("Could not determine the account"), "{message}");
        assert!(message.contains("Failed to spawn"), "{message}");
    }

    #[tokio::test]
    async fn explicit_account_connects_without_asking_the_provider() {
        let session = connect(&config_with_missing_provider(), Some("0xA11ce"))
            .await
            .unwrap();
        assert_eq!(session.identity.as_str(), "0xA11ce");
    }
}

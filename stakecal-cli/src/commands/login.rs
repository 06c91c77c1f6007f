use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use stakecal_core::Identity;
use stakecal_core::config::StakecalConfig;

use crate::utils::tui::with_spinner;

/// Remember `account`, or the provider's signer when none is given.
pub async fn login(mut config: StakecalConfig, account: Option<&str>) -> Result<()> {
    let identity = match account {
        Some(raw) => Identity::new(raw)?,
        None => {
            let ledger = config.ledger.ledger();
            with_spinner("Asking provider for its account", ledger.account())
                .await
                .context("Provider did not report an account. Pass one: `stakecal login <address>`")?
        }
    };

    config.account = Some(identity.to_string());
    config.save()?;

    println!("{} {}", "Logged in as".green(), identity.to_string().bold());
    Ok(())
}

pub fn logout(mut config: StakecalConfig) -> Result<()> {
    if config.account.take().is_none() {
        println!("{}", "Not logged in.".dimmed());
        return Ok(());
    }

    config.save()?;
    println!("{}", "Logged out.".green());
    Ok(())
}

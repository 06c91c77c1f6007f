use anyhow::Result;
use owo_colors::OwoColorize;
use stakecal_core::config::StakecalConfig;

pub fn run(config: &StakecalConfig) -> Result<()> {
    let config_path = StakecalConfig::config_path()?;
    let ledger = &config.ledger;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    if let Some(path) = &ledger.provider_path {
        println!("  Provider:   {}", path.display());
    }

    println!();
    println!("{}", "Ledger".bold());
    println!("  Provider:   {}", ledger.provider);
    println!("  Timeouts:   {}s read, {}s confirm", ledger.timeout_secs, ledger.confirm_timeout_secs);

    let mut keys: Vec<_> = ledger.params.iter().collect();
    keys.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in keys {
        println!("  {:<11} {}", format!("{key}:"), value);
    }

    println!();
    println!("{}", "Account".bold());
    match &config.account {
        Some(account) => println!("  {}", account),
        None => println!("  {}", "(provider's signing account)".dimmed()),
    }

    Ok(())
}

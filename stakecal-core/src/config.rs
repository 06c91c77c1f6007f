//! Global stakecal configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StakeCalError, StakeCalResult};
use crate::identity::Identity;
use crate::ledger::Ledger;
use crate::ledger::protocol::ProviderParams;
use crate::ledger::provider::{DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT, Provider};

fn default_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT.as_secs()
}

fn default_confirm_timeout_secs() -> u64 {
    DEFAULT_WRITE_TIMEOUT.as_secs()
}

/// Global configuration at ~/.config/stakecal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StakecalConfig {
    /// Account to view as. When unset the provider's signing account is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    pub ledger: LedgerConfig,
}

/// Which provider to talk to, and the params it needs (contract, chain, RPC...).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    pub provider: String,

    /// Explicit provider binary; otherwise `stakecal-provider-<provider>` in PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_path: Option<PathBuf>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl LedgerConfig {
    fn provider_params(&self) -> ProviderParams {
        self.params
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }

    pub fn ledger(&self) -> Ledger {
        let provider = match &self.provider_path {
            Some(path) => Provider::at_path(&self.provider, path),
            None => Provider::from_name(&self.provider),
        }
        .with_timeouts(
            Duration::from_secs(self.timeout_secs),
            Duration::from_secs(self.confirm_timeout_secs),
        );

        Ledger::new(provider, self.provider_params())
    }
}

impl StakecalConfig {
    pub fn config_path() -> StakeCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StakeCalError::Config("Could not determine config directory".into()))?
            .join("stakecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented template on first run.
    /// `STAKECAL_*` environment variables override file values
    /// (e.g. `STAKECAL_LEDGER__PROVIDER=fixture`).
    pub fn load() -> StakeCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> StakeCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("STAKECAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| StakeCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StakeCalError::Config(format!("{e} (in {})", path.display())))
    }

    pub fn identity(&self) -> StakeCalResult<Option<Identity>> {
        self.account.as_deref().map(Identity::new).transpose()
    }

    /// Save the current config to ~/.config/stakecal/config.toml
    pub fn save(&self) -> StakeCalResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| StakeCalError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| StakeCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with the ledger section filled in for the
    /// fixture provider and everything else commented out.
    pub fn create_default_config(path: &Path) -> StakeCalResult<()> {
        let contents = format!(
            "\
# stakecal configuration

# Account to view as (defaults to the provider's signing account):
# account = \"0x...\"

[ledger]
# Provider binary: stakecal-provider-<provider> on your PATH
provider = \"fixture\"

# Seconds to wait for reads and for transaction confirmation:
# timeout_secs = {}
# confirm_timeout_secs = {}

# Anything else in this section is passed to the provider as-is:
# contract = \"0x...\"
# chain_id = 11155111
# fixture_path = \"~/stakecal-fixture.json\"
",
            DEFAULT_READ_TIMEOUT.as_secs(),
            DEFAULT_WRITE_TIMEOUT.as_secs(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StakeCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StakeCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

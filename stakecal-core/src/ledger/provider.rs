//! Ledger provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `stakecal-provider-sepolia`) using JSON over stdin/stdout.
//!
//! The protocol is language-agnostic: any executable that speaks the JSON
//! protocol can be a provider. Providers manage their own keys and RPC
//! endpoints; stakecal just passes the params from the ledger config.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use crate::error::LedgerReadError;
use crate::ledger::protocol::{Command, LedgerCommand, Request, Response};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Writes wait for the transaction to be mined.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    path: Option<PathBuf>,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider {
            name: name.to_string(),
            path: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Use an explicit binary instead of looking one up in PATH.
    pub fn at_path(name: &str, path: impl Into<PathBuf>) -> Self {
        Provider {
            path: Some(path.into()),
            ..Provider::from_name(name)
        }
    }

    pub fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn binary_path(&self) -> Result<PathBuf, LedgerReadError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let binary_name = format!("stakecal-provider-{}", self.name);
        which::which(&binary_name)
            .map_err(|_| LedgerReadError::ProviderNotInstalled(binary_name))
    }

    /// Call a read command. The response type is inferred from the
    /// command's associated type.
    pub async fn read<C: LedgerCommand>(&self, cmd: C) -> Result<C::Response, LedgerReadError> {
        self.call_with_timeout(self.read_timeout, cmd).await
    }

    /// Submit a transaction and wait for its receipt.
    pub async fn write<C: LedgerCommand>(&self, cmd: C) -> Result<C::Response, LedgerReadError> {
        self.call_with_timeout(self.write_timeout, cmd).await
    }

    async fn call_with_timeout<C: LedgerCommand>(
        &self,
        limit: Duration,
        cmd: C,
    ) -> Result<C::Response, LedgerReadError> {
        let command = C::command();
        debug!(provider = %self.name, ?command, write = command.is_write(), "ledger call");

        timeout(limit, self.call_raw(command, cmd))
            .await
            .map_err(|_| LedgerReadError::Timeout(limit.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> Result<R, LedgerReadError> {
        let params = serde_json::to_value(params)
            .map_err(|e| LedgerReadError::Provider(format!("Failed to encode request: {e}")))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| LedgerReadError::Provider(format!("Failed to encode request: {e}")))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LedgerReadError::Provider(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LedgerReadError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(LedgerReadError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(LedgerReadError::Provider(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| LedgerReadError::Malformed(format!("{command:?} response: {e}")))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(LedgerReadError::Provider(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::protocol::{Account, ProviderParams};

    #[tokio::test]
    async fn missing_provider_is_reported_by_binary_name() {
        let provider = Provider::from_name("definitely-not-installed-anywhere");
        let err = provider
            .read(Account {
                params: ProviderParams::new(),
            })
            .await
            .unwrap_err();

        match err {
            LedgerReadError::ProviderNotInstalled(binary) => {
                assert_eq!(binary, "stakecal-provider-definitely-not-installed-anywhere")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unspawnable_path_is_a_provider_error() {
        let provider = Provider::at_path("ghost", "/nonexistent/stakecal-provider-ghost");
        let err = provider
            .read(Account {
                params: ProviderParams::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerReadError::Provider(_)), "{err:?}");
    }
}

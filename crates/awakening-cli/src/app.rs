//! Application context for the Awakening CLI.
//!
//! Bundles CLI arguments with the config file and resolves the values every
//! transaction needs: store path, caller principal and block height.

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;

use awakening_core::storage::{Principal, SqliteStore};
use awakening_core::{Protocol, TxContext};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, load_config, AwakeningConfig};
use crate::errors::CliError;
use crate::output::OutputMode;

/// Application context that bundles CLI args with the loaded configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: AwakeningConfig,
}

impl<'a> AppContext<'a> {
    /// Load the config file (explicit path, or the XDG default) and build a context.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = match cli.config {
            Some(ref path) => PathBuf::from(path),
            None => default_config_path()?,
        };
        let config = load_config(&config_path)?;
        tracing::debug!(path = %config_path.display(), "configuration loaded");
        Ok(Self { cli, config })
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Resolve the output mode: `--json`, then `--format`, then the config file,
    /// then table on a terminal and plain otherwise.
    pub fn output_mode(&self) -> anyhow::Result<OutputMode> {
        let flag = self.cli.format.as_deref().map(OutputMode::parse).transpose()?;
        Ok(OutputMode::resolve(
            self.cli.json,
            flag,
            self.config.output.format.map(OutputMode::from),
            std::io::stdout().is_terminal(),
        ))
    }

    /// Store path: `--store` / `AWAKENING_STORE`, then config, then the XDG default.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref path) = self.cli.store {
            return Ok(PathBuf::from(path));
        }
        if let Some(ref path) = self.config.store.path {
            return Ok(PathBuf::from(path));
        }
        default_store_path()
    }

    /// Caller principal: `--caller` / `AWAKENING_CALLER`, then config.
    pub fn caller(&self) -> anyhow::Result<Principal> {
        self.cli
            .caller
            .as_deref()
            .or(self.config.identity.caller.as_deref())
            .map(Principal::from)
            .ok_or_else(|| {
                CliError::usage_with_hint(
                    "No caller principal provided.",
                    "Hint: pass --caller, set AWAKENING_CALLER, or set [identity] caller in config.toml",
                )
                .into()
            })
    }

    /// Block height: `--height`, otherwise the current Unix time in seconds.
    pub fn block_height(&self) -> u64 {
        self.cli
            .height
            .unwrap_or_else(|| Utc::now().timestamp().max(1) as u64)
    }

    pub fn tx_context(&self) -> anyhow::Result<TxContext> {
        let caller = self.caller()?;
        let height = self.block_height();
        TxContext::new(caller, height).map_err(|e| CliError::usage(e.to_string()).into())
    }

    /// Open the configured store.
    pub fn open_protocol(&self) -> anyhow::Result<Protocol<SqliteStore>> {
        let path = self.store_path()?;
        if !path.exists() {
            return Err(CliError::usage_with_hint(
                format!("Store not found at {}", path.display()),
                "Hint: run `awakening init` to create it.",
            )
            .into());
        }
        let store = SqliteStore::open(&path)?;
        Ok(Protocol::new(store))
    }
}

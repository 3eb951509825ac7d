//! Handles settings for the teller. Configuration is read from
//! `config/teller.toml`, then `TELLER_*` environment variables, then the
//! command line.
//!
//! See `config/teller.toml` for the configuration.
use clap::Parser;
use engine::TransferPolicy;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/teller.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where accounts are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accounts {
    /// The demo accounts compiled into the binary.
    #[default]
    Builtin,
    /// A comma-separated flat file.
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Receipts {
    pub directory: String,
}

impl Default for Receipts {
    fn default() -> Self {
        Self {
            directory: "receipts".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Terminal {
    /// Echo `*` instead of the PIN when running on a real terminal.
    pub mask_pin: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self { mask_pin: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub accounts: Accounts,
    pub receipts: Receipts,
    pub transfer_policy: TransferPolicy,
    pub terminal: Terminal,
}

#[derive(Debug, Default, Parser)]
#[command(name = "teller", about = "Automated teller over in-memory accounts")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Load accounts from this flat file instead of the configured source.
    #[arg(long)]
    pub accounts: Option<String>,
    /// Directory receipts are written to.
    #[arg(long)]
    pub receipts: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "TELLER_LOG")]
    pub level: Option<String>,
    /// Let transfers take the source balance below zero.
    #[arg(long)]
    pub permissive_transfers: bool,
}

impl Settings {
    pub fn new(args: &Args) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(args.config.is_some()))
            .add_source(config::Environment::with_prefix("TELLER").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings.with_overrides(args))
    }

    fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(path) = &args.accounts {
            self.accounts = Accounts::File(path.clone());
        }
        if let Some(directory) = &args.receipts {
            self.receipts.directory = directory.clone();
        }
        if let Some(level) = &args.level {
            self.app.level = level.clone();
        }
        if args.permissive_transfers {
            self.transfer_policy = TransferPolicy::Permissive;
        }
        self
    }
}

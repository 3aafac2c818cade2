use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};
use ledger_client::GatewayOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub functions: FunctionNames,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LedgerConfig {
    pub wallet_dir: String,
    pub identity: String,
    pub network_config: String,
    pub channel: String,
    pub contract: String,
    pub endpoint: Option<String>,
    pub timeout_seconds: u64,
}

/// Contract operation names
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FunctionNames {
    pub transfer: String,
    pub balance: String,
    pub account: String,
    pub accounts: String,
}

impl Default for FunctionNames {
    fn default() -> Self {
        Self {
            transfer: "querySend".to_string(),
            balance: "getBalance".to_string(),
            account: "queryCoinAccount".to_string(),
            accounts: "queryAllCoinAccounts".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub json: bool,
    pub filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::with_defaults()?
            .add_source(Environment::with_prefix("LEDGER_GATEWAY").separator("__"));

        if let Ok(port) = env::var("SERVICE_PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let functions = FunctionNames::default();

        config::Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Ledger connection
            .set_default("ledger.wallet_dir", "wallet")?
            .set_default("ledger.identity", "appUser")?
            .set_default("ledger.network_config", "connection.json")?
            .set_default("ledger.channel", "mychannel")?
            .set_default("ledger.contract", "fabcoin")?
            .set_default("ledger.timeout_seconds", 30)?
            // Contract operations
            .set_default("functions.transfer", functions.transfer)?
            .set_default("functions.balance", functions.balance)?
            .set_default("functions.account", functions.account)?
            .set_default("functions.accounts", functions.accounts)?
            // Logging
            .set_default("log.json", false)?
            .set_default("log.filter", "info")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            wallet_dir: PathBuf::from(&self.ledger.wallet_dir),
            identity: self.ledger.identity.clone(),
            network_config: PathBuf::from(&self.ledger.network_config),
            channel: self.ledger.channel.clone(),
            contract: self.ledger.contract.clone(),
            endpoint: self.ledger.endpoint.clone(),
            timeout: Duration::from_secs(self.ledger.timeout_seconds),
        }
    }
}

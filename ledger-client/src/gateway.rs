//! Gateway connector: wallet identity + connection profile → live connection

use crate::client::{Connection, Connector};
use crate::error::{LedgerError, Result};
use crate::http::HttpLedgerClient;
use crate::profile::ConnectionProfile;
use crate::wallet::Wallet;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Gateway connection options
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Wallet directory
    pub wallet_dir: PathBuf,

    /// Identity label inside the wallet
    pub identity: String,

    /// Connection profile file
    pub network_config: PathBuf,

    /// Channel name
    pub channel: String,

    /// Contract name
    pub contract: String,

    /// Gateway base URL, overrides the peer resolved from the profile
    pub endpoint: Option<String>,

    /// Per-call timeout
    pub timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            wallet_dir: PathBuf::from("wallet"),
            identity: "appUser".to_string(),
            network_config: PathBuf::from("connection.json"),
            channel: "mychannel".to_string(),
            contract: "fabcoin".to_string(),
            endpoint: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// [`Connector`] that reads the wallet and profile from disk on every connect
#[derive(Debug, Clone)]
pub struct FabricGateway {
    options: GatewayOptions,
}

impl FabricGateway {
    /// Create a connector
    pub fn new(options: GatewayOptions) -> Self {
        Self { options }
    }

    /// Connection options
    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    async fn open(&self) -> Result<HttpLedgerClient> {
        let options = &self.options;

        let identity = Wallet::new(&options.wallet_dir).get(&options.identity).await?;
        let profile = ConnectionProfile::from_file(&options.network_config).await?;

        let mut builder = reqwest::Client::builder().connect_timeout(options.timeout);
        let base_url = match &options.endpoint {
            Some(url) => url.clone(),
            None => {
                let endpoint = profile.endpoint().await?;
                if let Some(pem) = &endpoint.tls_ca_pem {
                    let cert = reqwest::Certificate::from_pem(pem.as_bytes()).map_err(|e| {
                        LedgerError::NetworkConfig(format!(
                            "invalid TLS CA certificate for {}: {}",
                            endpoint.peer, e
                        ))
                    })?;
                    builder = builder.add_root_certificate(cert);
                }
                endpoint.url
            }
        };

        let http = builder
            .build()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        info!(
            "Connected to {} as {} ({}) on {}/{}",
            base_url, options.identity, identity.msp_id, options.channel, options.contract
        );

        Ok(HttpLedgerClient::new(
            http,
            base_url,
            options.channel.clone(),
            options.contract.clone(),
            &identity,
            options.timeout,
        ))
    }
}

#[async_trait]
impl Connector for FabricGateway {
    async fn connect(&self) -> Result<Connection> {
        let client = self.open().await?;
        Ok(Connection::new(Box::new(client)))
    }
}

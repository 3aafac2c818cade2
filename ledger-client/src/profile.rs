//! Connection profile describing the ledger network topology

use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Common connection profile (`connection.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionProfile {
    /// Network name
    #[serde(default)]
    pub name: String,

    /// Profile version
    #[serde(default)]
    pub version: String,

    /// Client section, names the organization this process acts for
    #[serde(default)]
    pub client: Option<ClientSection>,

    /// Organizations by name
    #[serde(default)]
    pub organizations: BTreeMap<String, Organization>,

    /// Peers by name
    #[serde(default)]
    pub peers: BTreeMap<String, Peer>,

    /// Directory relative TLS certificate paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Client section of a profile
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    /// Organization name
    pub organization: String,
}

/// Organization entry
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    /// Membership service provider id
    pub mspid: String,

    /// Peer names owned by the organization, in preference order
    #[serde(default)]
    pub peers: Vec<String>,
}

/// Peer entry
#[derive(Debug, Clone, Deserialize)]
pub struct Peer {
    /// Peer address (`grpc://` or `grpcs://`)
    pub url: String,

    /// TLS CA certificate, inline or by path
    #[serde(rename = "tlsCACerts", default)]
    pub tls_ca_certs: Option<TlsCaCerts>,
}

/// TLS CA certificate reference
#[derive(Debug, Clone, Deserialize)]
pub struct TlsCaCerts {
    /// Inline PEM
    #[serde(default)]
    pub pem: Option<String>,

    /// Path to a PEM file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Resolved gateway endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Peer name
    pub peer: String,

    /// HTTP(S) base URL
    pub url: String,

    /// TLS CA certificate to trust, PEM encoded
    pub tls_ca_pem: Option<String>,
}

impl ConnectionProfile {
    /// Load from file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading connection profile from {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            LedgerError::NetworkConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut profile = Self::from_json(&content)?;
        profile.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(profile)
    }

    /// Parse from a JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| LedgerError::NetworkConfig(format!("failed to parse profile: {}", e)))
    }

    /// Organization this client acts for, if the profile names one
    pub fn client_organization(&self) -> Option<&Organization> {
        let name = &self.client.as_ref()?.organization;
        self.organizations.get(name)
    }

    /// Peer the gateway connects through.
    ///
    /// First peer of the client organization; otherwise the first peer by name.
    pub fn gateway_peer(&self) -> Result<(&str, &Peer)> {
        if let Some(org) = self.client_organization() {
            for name in &org.peers {
                if let Some((name, peer)) = self.peers.get_key_value(name) {
                    return Ok((name.as_str(), peer));
                }
            }
        }

        self.peers
            .iter()
            .next()
            .map(|(name, peer)| (name.as_str(), peer))
            .ok_or_else(|| LedgerError::NetworkConfig("profile defines no peers".to_string()))
    }

    /// Resolve the gateway endpoint, loading its TLS CA certificate if any
    pub async fn endpoint(&self) -> Result<Endpoint> {
        let (name, peer) = self.gateway_peer()?;
        let url = http_url(&peer.url)?;

        let tls_ca_pem = match &peer.tls_ca_certs {
            Some(TlsCaCerts { pem: Some(pem), .. }) => Some(pem.clone()),
            Some(TlsCaCerts { path: Some(path), .. }) => {
                let path = self.base_dir.join(path);
                let pem = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    LedgerError::NetworkConfig(format!(
                        "failed to read TLS CA certificate {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Some(pem)
            }
            _ => None,
        };

        Ok(Endpoint {
            peer: name.to_string(),
            url,
            tls_ca_pem,
        })
    }
}

/// Map a peer address to the gateway's HTTP base URL
pub fn http_url(peer_url: &str) -> Result<String> {
    let (scheme, rest) = peer_url
        .split_once("://")
        .ok_or_else(|| LedgerError::NetworkConfig(format!("invalid peer url: {}", peer_url)))?;

    let scheme = match scheme {
        "grpc" | "http" => "http",
        "grpcs" | "https" => "https",
        other => {
            return Err(LedgerError::NetworkConfig(format!(
                "unsupported peer url scheme: {}",
                other
            )))
        }
    };

    Ok(format!("{}://{}", scheme, rest.trim_end_matches('/')))
}

//! JSON over HTTP transport to the ledger gateway
//!
//! `POST {base}/api/v1/channels/{channel}/contracts/{contract}/transactions/{name}/{submit|evaluate}`
//! with body `{"args": [...], "identity": {"mspId": ..., "certificate": ...}}`.
//! A 2xx answer carries the raw transaction result as the body.

use crate::client::LedgerClient;
use crate::error::{LedgerError, Result};
use crate::wallet::Identity;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Submit,
    Evaluate,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Submit => "submit",
            Mode::Evaluate => "evaluate",
        }
    }
}

#[derive(Serialize)]
struct TransactionRequest<'a> {
    args: &'a [String],
    identity: RequestIdentity<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestIdentity<'a> {
    msp_id: &'a str,
    certificate: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// [`LedgerClient`] bound to one channel and one contract of an HTTP gateway
#[derive(Debug)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    base_url: String,
    channel: String,
    contract: String,
    msp_id: String,
    certificate: String,
    timeout: Duration,
    closed: AtomicBool,
}

impl HttpLedgerClient {
    /// Client acting as `identity` against `channel`/`contract` at `base_url`
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        channel: impl Into<String>,
        contract: impl Into<String>,
        identity: &Identity,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            channel: channel.into(),
            contract: contract.into(),
            msp_id: identity.msp_id.clone(),
            certificate: identity.credentials.certificate.clone(),
            timeout,
            closed: AtomicBool::new(false),
        }
    }

    fn transaction_url(&self, name: &str, mode: Mode) -> String {
        format!(
            "{}/api/v1/channels/{}/contracts/{}/transactions/{}/{}",
            self.base_url,
            self.channel,
            self.contract,
            name,
            mode.as_str()
        )
    }

    async fn invoke(&self, name: &str, args: &[String], mode: Mode) -> Result<Bytes> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LedgerError::Closed);
        }

        let url = self.transaction_url(name, mode);
        debug!("{} {} with {} args", mode.as_str(), name, args.len());

        let body = TransactionRequest {
            args,
            identity: RequestIdentity {
                msp_id: &self.msp_id,
                certificate: &self.certificate,
            },
        };

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(name, e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map_err(|e| self.transport_error(name, e));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                debug!("Unreadable error body for {} {}: {}", mode.as_str(), name, e);
                String::new()
            }
        };
        warn!("Gateway answered {} for {} {}", status, mode.as_str(), name);

        if status == StatusCode::NOT_FOUND {
            return Err(LedgerError::ContractNotFound {
                channel: self.channel.clone(),
                contract: self.contract.clone(),
            });
        }

        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or(text);

        Err(LedgerError::Transaction {
            name: name.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(&self, name: &str, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout {
                seconds: self.timeout.as_secs(),
                operation: name.to_string(),
            }
        } else {
            LedgerError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.invoke(name, args, Mode::Submit).await
    }

    async fn evaluate(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.invoke(name, args, Mode::Evaluate).await
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Closed gateway connection to {}", self.base_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Credentials;
    use httpmock::prelude::*;
    use serde_json::json;

    fn identity() -> Identity {
        Identity {
            credentials: Credentials {
                certificate: "CERT".to_string(),
                private_key: "KEY".to_string(),
            },
            msp_id: "Org1MSP".to_string(),
            kind: "X.509".to_string(),
            version: 1,
        }
    }

    fn client(base_url: String, timeout: Duration) -> HttpLedgerClient {
        HttpLedgerClient::new(
            reqwest::Client::new(),
            base_url,
            "mychannel",
            "fabcoin",
            &identity(),
            timeout,
        )
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_evaluate_returns_raw_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/channels/mychannel/contracts/fabcoin/transactions/getBalance/evaluate")
                    .json_body(json!({
                        "args": ["7", "2024-01-01T00:00:00Z", "test1", "k", "s"],
                        "identity": { "mspId": "Org1MSP", "certificate": "CERT" }
                    }));
                then.status(200).body("123.45");
            })
            .await;

        let client = client(server.base_url(), Duration::from_secs(5));
        let payload = client
            .evaluate("getBalance", &args(&["7", "2024-01-01T00:00:00Z", "test1", "k", "s"]))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(&payload[..], b"123.45");
    }

    #[tokio::test]
    async fn test_submit_uses_submit_route() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/channels/mychannel/contracts/fabcoin/transactions/querySend/submit");
                then.status(200).body("90");
            })
            .await;

        let client = client(server.base_url(), Duration::from_secs(5));
        let payload = client.submit("querySend", &args(&["42"])).await.unwrap();

        mock.assert_async().await;
        assert_eq!(&payload[..], b"90");
    }

    #[tokio::test]
    async fn test_error_message_from_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500)
                    .json_body(json!({ "message": "Failed to send, balance is not enough." }));
            })
            .await;

        let client = client(server.base_url(), Duration::from_secs(5));
        let err = client.submit("querySend", &args(&["42"])).await.unwrap_err();

        match err {
            LedgerError::Transaction { name, status, message } => {
                assert_eq!(name, "querySend");
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to send, balance is not enough.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_message_from_plain_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(400).body("test9 does not exist");
            })
            .await;

        let client = client(server.base_url(), Duration::from_secs(5));
        let err = client.evaluate("getBalance", &args(&["1"])).await.unwrap_err();
        assert!(matches!(err, LedgerError::Transaction { message, .. } if message == "test9 does not exist"));
    }

    #[tokio::test]
    async fn test_error_without_body_keeps_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503);
            })
            .await;

        let err = client(server.base_url(), Duration::from_secs(5))
            .evaluate("getBalance", &args(&["1"]))
            .await
            .unwrap_err();

        match err {
            LedgerError::Transaction { status, message, .. } => {
                assert_eq!(status, 503);
                assert!(message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_maps_to_contract_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(404);
            })
            .await;

        let client = client(server.base_url(), Duration::from_secs(5));
        let err = client.evaluate("getBalance", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::ContractNotFound { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("1").delay(Duration::from_millis(500));
            })
            .await;

        let client = client(server.base_url(), Duration::from_millis(50));
        let err = client.evaluate("getBalance", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Timeout { operation, .. } if operation == "getBalance"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let client = client("http://127.0.0.1:1".to_string(), Duration::from_secs(2));
        let err = client.evaluate("getBalance", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Connection(_)));
    }

    #[tokio::test]
    async fn test_closed_client_rejects_calls() {
        let client = client("http://127.0.0.1:1".to_string(), Duration::from_secs(2));
        client.close();
        let err = client.submit("querySend", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Closed));
    }
}

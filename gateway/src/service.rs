// Ledger service: validate, open a connection, invoke, shape the result
// Every failure ends up in the returned status line; nothing escapes to the transport

use ledger_client::{Connection, Connector};
use std::ops::{Deref, RangeInclusive};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::FunctionNames;
use crate::error::GatewayError;
use crate::metrics::METRICS;
use crate::models::{
    format_amount, AccountResult, AccountsResult, BalanceRequest, BalanceResult, CoinAccount,
    SendResult, TransferRequest,
};

pub const ID_RANGE: RangeInclusive<i64> = 0..=2_000_000_000;

fn payload_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}

/// Connection that also reports its release to the metrics registry.
/// The inner connection closes right after this wrapper is dropped.
struct TrackedConnection {
    conn: Connection,
}

impl Deref for TrackedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for TrackedConnection {
    fn drop(&mut self) {
        METRICS.connections_closed_total.inc();
    }
}

#[derive(Clone)]
pub struct LedgerService {
    connector: Arc<dyn Connector>,
    functions: FunctionNames,
}

impl LedgerService {
    pub fn new(connector: Arc<dyn Connector>, functions: FunctionNames) -> Self {
        Self {
            connector,
            functions,
        }
    }

    async fn connect(&self) -> Result<TrackedConnection, GatewayError> {
        let conn = self.connector.connect().await?;
        METRICS.connections_opened_total.inc();
        Ok(TrackedConnection { conn })
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), id = request.id))]
    pub async fn send(&self, request: &TransferRequest) -> SendResult {
        let id = request.id;

        if !ID_RANGE.contains(&id) {
            warn!("Rejected transfer: id {} out of range", id);
            METRICS.track_rejection("send");
            return SendResult::new("Error id", id);
        }

        if !(request.amount.is_finite() && request.amount > 0.0) {
            warn!("Rejected transfer {}: amount {}", id, request.amount);
            METRICS.track_rejection("send");
            return SendResult::new(format!("Error amount: {}", format_amount(request.amount)), id);
        }

        let start = Instant::now();
        let outcome = self.submit_transfer(request).await;
        METRICS.track_ledger_call(
            &self.functions.transfer,
            start.elapsed().as_secs_f64(),
            outcome.is_err(),
        );

        match outcome {
            Ok(payload) => {
                info!("Transfer {} from {} to {} submitted: {}", id, request.from, request.to, payload);
                SendResult::new("OK", id)
            }
            Err(e) => {
                error!(error = ?e, "Transfer {} failed: {}", id, e);
                SendResult {
                    kind: Some(e.kind()),
                    ..SendResult::new(e.status(), id)
                }
            }
        }
    }

    async fn submit_transfer(&self, request: &TransferRequest) -> Result<String, GatewayError> {
        let conn = self.connect().await?;
        let payload = conn
            .submit(&self.functions.transfer, &request.to_args())
            .await?;
        Ok(payload_text(&payload))
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), id = request.id))]
    pub async fn get_balance(&self, request: &BalanceRequest) -> BalanceResult {
        let id = request.id;

        if !ID_RANGE.contains(&id) {
            warn!("Rejected balance query: id {} out of range", id);
            METRICS.track_rejection("get-balance");
            return BalanceResult::new("Error id:", id, -1.0);
        }

        let start = Instant::now();
        let outcome = self.query_balance(request).await;
        METRICS.track_ledger_call(
            &self.functions.balance,
            start.elapsed().as_secs_f64(),
            outcome.is_err(),
        );

        match outcome {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => BalanceResult::new("OK", id, amount),
            Ok(amount) => {
                // Negative or non-finite balances are reported with the generic fallback status
                warn!("Balance for {} parsed as {}, answering fallback", request.account, amount);
                BalanceResult::new("Error", id, 0.0)
            }
            Err(e) => {
                error!(error = ?e, "Balance query {} failed: {}", id, e);
                BalanceResult {
                    kind: Some(e.kind()),
                    ..BalanceResult::new(e.status(), id, -1.0)
                }
            }
        }
    }

    async fn query_balance(&self, request: &BalanceRequest) -> Result<f64, GatewayError> {
        let conn = self.connect().await?;
        let payload = conn
            .evaluate(&self.functions.balance, &request.to_args())
            .await?;

        let text = payload_text(&payload);
        info!("Balance:{}", text);

        text.trim()
            .parse::<f64>()
            .map_err(|source| GatewayError::InvalidBalance {
                payload: text.clone(),
                source,
            })
    }

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn account(&self, account: &str) -> AccountResult {
        let start = Instant::now();
        let outcome = self.query_account(account).await;
        METRICS.track_ledger_call(
            &self.functions.account,
            start.elapsed().as_secs_f64(),
            outcome.is_err(),
        );

        match outcome {
            Ok(record) => AccountResult {
                status: "OK".to_string(),
                account: Some(record),
                kind: None,
            },
            Err(e) => {
                error!(error = ?e, "Account query for {} failed: {}", account, e);
                AccountResult {
                    status: e.status(),
                    account: None,
                    kind: Some(e.kind()),
                }
            }
        }
    }

    async fn query_account(&self, account: &str) -> Result<CoinAccount, GatewayError> {
        let conn = self.connect().await?;
        let payload = conn
            .evaluate(&self.functions.account, &[account.to_string()])
            .await?;
        Ok(serde_json::from_slice(&payload)?)
    }

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn accounts(&self) -> AccountsResult {
        let start = Instant::now();
        let outcome = self.query_accounts().await;
        METRICS.track_ledger_call(
            &self.functions.accounts,
            start.elapsed().as_secs_f64(),
            outcome.is_err(),
        );

        match outcome {
            Ok(accounts) => AccountsResult {
                status: "OK".to_string(),
                accounts,
                kind: None,
            },
            Err(e) => {
                error!(error = ?e, "Account listing failed: {}", e);
                AccountsResult {
                    status: e.status(),
                    accounts: Vec::new(),
                    kind: Some(e.kind()),
                }
            }
        }
    }

    async fn query_accounts(&self) -> Result<Vec<CoinAccount>, GatewayError> {
        let conn = self.connect().await?;
        let payload = conn.evaluate(&self.functions.accounts, &[]).await?;

        if payload.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let accounts: Option<Vec<CoinAccount>> = serde_json::from_slice(&payload)?;
        Ok(accounts.unwrap_or_default())
    }
}

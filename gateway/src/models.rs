// Request and response shapes of the HTTP surface

use chrono::{DateTime, Utc};
use ledger_client::ErrorKind;
use serde::{Deserialize, Serialize};

/// Renders an amount the way the ledger clients have always printed doubles:
/// `5.0`, `-2.5`, `1.0E7`, `1.0E-4`, `NaN`, `Infinity`.
pub fn format_amount(amount: f64) -> String {
    if amount.is_nan() {
        return "NaN".to_string();
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }

    let magnitude = amount.abs();
    if magnitude == 0.0 || (1.0e-3..1.0e7).contains(&magnitude) {
        let text = amount.to_string();
        return if text.contains('.') { text } else { format!("{}.0", text) };
    }

    // Shortest round-trip digits, scientific form with a decimal mantissa
    let text = format!("{:e}", amount);
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{}E{}", mantissa, exponent),
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => text,
    }
}

#[derive(Debug, Deserialize)]
pub struct HelloQuery {
    pub name: Option<String>,
}

/// `/send` parameters, forwarded positionally to the transfer operation
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub id: i64,
    pub timestamp: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub key: String,
    pub signature: String,
}

impl TransferRequest {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.timestamp.clone(),
            self.from.clone(),
            self.to.clone(),
            format_amount(self.amount),
            self.key.clone(),
            self.signature.clone(),
        ]
    }
}

/// `/get-balance` parameters, forwarded positionally to the balance operation
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRequest {
    pub id: i64,
    pub timestamp: String,
    pub account: String,
    pub key: String,
    pub signature: String,
}

impl BalanceRequest {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.timestamp.clone(),
            self.account.clone(),
            self.key.clone(),
            self.signature.clone(),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendResult {
    pub status: String,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl SendResult {
    pub fn new(status: impl Into<String>, id: i64) -> Self {
        Self {
            status: status.into(),
            id,
            kind: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BalanceResult {
    pub status: String,
    pub id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl BalanceResult {
    pub fn new(status: impl Into<String>, id: i64, amount: f64) -> Self {
        Self {
            status: status.into(),
            id,
            amount,
            kind: None,
        }
    }
}

/// Account record as stored by the contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinAccount {
    pub account: String,
    pub balance: f64,
    pub publickey: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<CoinAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountsResult {
    pub status: String,
    pub accounts: Vec<CoinAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub channel: String,
    pub contract: String,
    pub timestamp: DateTime<Utc>,
}

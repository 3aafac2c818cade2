use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use ledger_client::{ErrorKind, LedgerError};
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid balance payload {payload:?}: {source}")]
    InvalidBalance {
        payload: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Invalid account payload: {0}")]
    InvalidAccount(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Ledger(e) => e.kind(),
            GatewayError::InvalidBalance { .. } | GatewayError::InvalidAccount(_) => {
                ErrorKind::InvalidPayload
            }
            GatewayError::Metrics(_) => ErrorKind::Internal,
        }
    }

    /// Status line reported to callers of the ledger endpoints
    pub fn status(&self) -> String {
        format!("Error:{}", self)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "timestamp": Utc::now(),
            })),
        )
            .into_response()
    }
}

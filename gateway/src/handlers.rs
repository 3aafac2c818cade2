use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::error::GatewayError;
use crate::metrics::METRICS;
use crate::models::{
    AccountQuery, AccountResult, AccountsResult, BalanceRequest, BalanceResult, HealthResponse,
    HelloQuery, SendResult, TransferRequest,
};
use crate::routes::AppState;

pub async fn hello(Query(query): Query<HelloQuery>) -> String {
    METRICS.track_request("hello");
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "World".to_string());
    format!("Hello {}!", name)
}

pub async fn send(
    State(state): State<AppState>,
    Query(request): Query<TransferRequest>,
) -> Json<SendResult> {
    METRICS.track_request("send");
    info!("Received transfer {}: {} -> {} ({})", request.id, request.from, request.to, request.amount);
    Json(state.service.send(&request).await)
}

pub async fn get_balance(
    State(state): State<AppState>,
    Query(request): Query<BalanceRequest>,
) -> Json<BalanceResult> {
    METRICS.track_request("get-balance");
    info!("Received balance query {} for {}", request.id, request.account);
    Json(state.service.get_balance(&request).await)
}

pub async fn account(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Json<AccountResult> {
    METRICS.track_request("account");
    Json(state.service.account(&query.account).await)
}

pub async fn accounts(State(state): State<AppState>) -> Json<AccountsResult> {
    METRICS.track_request("accounts");
    Json(state.service.accounts().await)
}

// Does not touch the ledger: connections are opened per request only
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "ledger-gateway",
        version: env!("CARGO_PKG_VERSION"),
        channel: state.channel.clone(),
        contract: state.contract.clone(),
        timestamp: Utc::now(),
    })
}

// Prometheus metrics endpoint
pub async fn metrics() -> Result<String, GatewayError> {
    METRICS
        .export()
        .map_err(|e| GatewayError::Metrics(format!("Failed to export metrics: {}", e)))
}

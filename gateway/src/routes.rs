use axum::{routing::get, Router};
use ledger_client::Connector;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::FunctionNames;
use crate::handlers;
use crate::service::LedgerService;

#[derive(Clone)]
pub struct AppState {
    pub service: LedgerService,
    pub channel: String,
    pub contract: String,
}

impl AppState {
    pub fn new(
        connector: Arc<dyn Connector>,
        functions: FunctionNames,
        channel: impl Into<String>,
        contract: impl Into<String>,
    ) -> Self {
        Self {
            service: LedgerService::new(connector, functions),
            channel: channel.into(),
            contract: contract.into(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/hello", get(handlers::hello))
        .route("/send", get(handlers::send))
        .route("/get-balance", get(handlers::get_balance))
        .route("/account", get(handlers::account))
        .route("/accounts", get(handlers::accounts))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// Ledger Gateway Library
// Exposes modules for testing and integration

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod service;

pub use routes::{create_app, AppState};

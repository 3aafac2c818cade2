//! Fabcoin Ledger Client
//!
//! Thin client for invoking named contract operations on an external ledger
//! network through its gateway.
//!
//! # Architecture
//!
//! - **Connector**: opens one [`Connection`] bound to a channel and a contract
//! - **LedgerClient**: `submit` (state-changing) and `evaluate` (read-only)
//!   calls with positional string arguments, returning raw bytes
//! - **Connection guard**: the underlying client is closed exactly once,
//!   whichever way the owning scope exits
//!
//! Identities come from a file-system [`Wallet`]; network topology comes from a
//! [`ConnectionProfile`].

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod client;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mock;
pub mod profile;
pub mod wallet;

// Re-exports
pub use client::{Connection, Connector, LedgerClient};
pub use error::{ErrorKind, LedgerError, Result};
pub use gateway::{FabricGateway, GatewayOptions};
pub use mock::MockLedger;
pub use profile::ConnectionProfile;
pub use wallet::{Identity, Wallet};

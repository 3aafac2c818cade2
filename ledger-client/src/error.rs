//! Error types for ledger access

use serde::Serialize;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger client errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Wallet directory or identity file could not be read or decoded
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Requested identity label is not present in the wallet
    #[error("Identity not found in wallet: {0}")]
    IdentityNotFound(String),

    /// Connection profile could not be read, decoded or resolved
    #[error("Network config error: {0}")]
    NetworkConfig(String),

    /// Gateway unreachable or transport failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Channel or contract unknown to the gateway
    #[error("Contract not found: {contract} on channel {channel}")]
    ContractNotFound {
        /// Channel name
        channel: String,
        /// Contract name
        contract: String,
    },

    /// Gateway rejected or failed the transaction
    #[error("Transaction {name} failed with status {status}: {message}")]
    Transaction {
        /// Operation name
        name: String,
        /// Gateway status code
        status: u16,
        /// Gateway error message
        message: String,
    },

    /// No answer within the configured deadline
    #[error("Timeout after {seconds}s: {operation}")]
    Timeout {
        /// Timeout duration
        seconds: u64,
        /// Operation
        operation: String,
    },

    /// Connection already released
    #[error("Connection closed")]
    Closed,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wallet unreadable
    Wallet,
    /// Identity missing from wallet
    IdentityNotFound,
    /// Connection profile problem
    NetworkConfig,
    /// Transport failure
    Connection,
    /// Unknown channel or contract
    ContractNotFound,
    /// Remote transaction failure
    Transaction,
    /// Deadline exceeded
    Timeout,
    /// Response payload could not be interpreted
    InvalidPayload,
    /// Anything else
    Internal,
}

impl LedgerError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Wallet(_) => ErrorKind::Wallet,
            LedgerError::IdentityNotFound(_) => ErrorKind::IdentityNotFound,
            LedgerError::NetworkConfig(_) => ErrorKind::NetworkConfig,
            LedgerError::Connection(_) => ErrorKind::Connection,
            LedgerError::ContractNotFound { .. } => ErrorKind::ContractNotFound,
            LedgerError::Transaction { .. } => ErrorKind::Transaction,
            LedgerError::Timeout { .. } => ErrorKind::Timeout,
            LedgerError::Serialization(_) => ErrorKind::InvalidPayload,
            LedgerError::Closed | LedgerError::Io(_) => ErrorKind::Internal,
        }
    }
}

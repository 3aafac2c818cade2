//! Scripted in-memory ledger for tests and local runs

use crate::client::{Connection, Connector, LedgerClient};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Which kind of call reached the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// `submit`
    Submit,
    /// `evaluate`
    Evaluate,
}

/// Recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Submit or evaluate
    pub mode: CallMode,
    /// Operation name
    pub name: String,
    /// Positional arguments
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, std::result::Result<Bytes, String>>,
    connect_error: Option<String>,
    calls: Vec<MockCall>,
    connects: usize,
    opened: usize,
    closed: usize,
}

/// [`Connector`] answering operations from a fixed script.
///
/// Clones share state, so a test can keep one handle and give another to the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockState>>,
}

impl MockLedger {
    /// Mock with no scripted operations
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name` with `payload`
    pub fn with_response(self, name: &str, payload: impl AsRef<[u8]>) -> Self {
        self.state.lock().responses.insert(
            name.to_string(),
            Ok(Bytes::copy_from_slice(payload.as_ref())),
        );
        self
    }

    /// Fail `name` with a transaction error carrying `message`
    pub fn with_failure(self, name: &str, message: &str) -> Self {
        self.state
            .lock()
            .responses
            .insert(name.to_string(), Err(message.to_string()));
        self
    }

    /// Fail every connect attempt
    pub fn with_connect_failure(self, message: &str) -> Self {
        self.state.lock().connect_error = Some(message.to_string());
        self
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Connect attempts, including failed ones
    pub fn connects(&self) -> usize {
        self.state.lock().connects
    }

    /// Connections successfully opened
    pub fn opened(&self) -> usize {
        self.state.lock().opened
    }

    /// Connections closed
    pub fn closed(&self) -> usize {
        self.state.lock().closed
    }
}

#[async_trait]
impl Connector for MockLedger {
    async fn connect(&self) -> Result<Connection> {
        let mut state = self.state.lock();
        state.connects += 1;

        if let Some(message) = &state.connect_error {
            return Err(LedgerError::Connection(message.clone()));
        }

        state.opened += 1;
        info!("Mock ledger: opened connection #{}", state.opened);

        Ok(Connection::new(Box::new(MockClient {
            state: self.state.clone(),
        })))
    }
}

struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    fn invoke(&self, mode: CallMode, name: &str, args: &[String]) -> Result<Bytes> {
        let mut state = self.state.lock();
        state.calls.push(MockCall {
            mode,
            name: name.to_string(),
            args: args.to_vec(),
        });

        match state.responses.get(name) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(message)) => Err(LedgerError::Transaction {
                name: name.to_string(),
                status: 500,
                message: message.clone(),
            }),
            None => Err(LedgerError::Transaction {
                name: name.to_string(),
                status: 500,
                message: format!("no mock response for {}", name),
            }),
        }
    }
}

#[async_trait]
impl LedgerClient for MockClient {
    async fn submit(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.invoke(CallMode::Submit, name, args)
    }

    async fn evaluate(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.invoke(CallMode::Evaluate, name, args)
    }

    fn close(&self) {
        self.state.lock().closed += 1;
    }
}

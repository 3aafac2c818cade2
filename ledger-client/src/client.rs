//! Ledger client capability and the scoped connection guard

use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// Invokes named operations on one contract of one channel.
///
/// Arguments are positional strings; the contract decides how to interpret
/// them. Responses are returned as raw bytes.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a state-changing transaction (ordered and committed by the network)
    async fn submit(&self, name: &str, args: &[String]) -> Result<Bytes>;

    /// Evaluate a read-only transaction against a single peer
    async fn evaluate(&self, name: &str, args: &[String]) -> Result<Bytes>;

    /// Release any resources held by the client
    fn close(&self);
}

/// Opens ledger connections
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection bound to the configured channel and contract
    async fn connect(&self) -> Result<Connection>;
}

/// Owned, scoped handle to a [`LedgerClient`].
///
/// The wrapped client is closed exactly once: on [`Connection::close`] or when
/// the connection is dropped, whichever comes first.
pub struct Connection {
    client: Option<Box<dyn LedgerClient>>,
}

impl Connection {
    /// Wrap an opened client
    pub fn new(client: Box<dyn LedgerClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Submit a state-changing transaction
    pub async fn submit(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.client()?.submit(name, args).await
    }

    /// Evaluate a read-only transaction
    pub async fn evaluate(&self, name: &str, args: &[String]) -> Result<Bytes> {
        self.client()?.evaluate(name, args).await
    }

    /// Close the connection now instead of at end of scope
    pub fn close(mut self) {
        self.release();
    }

    fn client(&self) -> Result<&dyn LedgerClient> {
        self.client.as_deref().ok_or(LedgerError::Closed)
    }

    fn release(&mut self) {
        if let Some(client) = self.client.take() {
            client.close();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("open", &self.client.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingClient {
        closes: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl LedgerClient for CountingClient {
        async fn submit(&self, name: &str, _args: &[String]) -> Result<Bytes> {
            if self.fail {
                return Err(LedgerError::Transaction {
                    name: name.to_string(),
                    status: 500,
                    message: "endorsement failure".to_string(),
                });
            }
            Ok(Bytes::from_static(b"ok"))
        }

        async fn evaluate(&self, _name: &str, _args: &[String]) -> Result<Bytes> {
            Ok(Bytes::from_static(b"42"))
        }

        fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn connection(fail: bool) -> (Connection, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let client = CountingClient {
            closes: closes.clone(),
            fail,
        };
        (Connection::new(Box::new(client)), closes)
    }

    async fn submit_then_drop(conn: Connection) -> Result<Bytes> {
        let payload = conn.submit("querySend", &[]).await?;
        Ok(payload)
    }

    #[tokio::test]
    async fn test_drop_closes_once() {
        let (conn, closes) = connection(false);
        let payload = conn.evaluate("getBalance", &[]).await.unwrap();
        assert_eq!(&payload[..], b"42");
        drop(conn);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_explicit_close_is_not_repeated_on_drop() {
        let (conn, closes) = connection(false);
        conn.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_path_still_closes() {
        let (conn, closes) = connection(true);
        let result = submit_then_drop(conn).await;
        assert!(matches!(result, Err(LedgerError::Transaction { .. })));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_reports_open_state() {
        let (conn, _closes) = connection(false);
        assert_eq!(format!("{:?}", conn), "Connection { open: true }");
    }
}

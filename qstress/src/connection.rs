//! Connection provider capability
//!
//! The engine knows nothing about wire protocols. A [`Connector`] opens connections to the target
//! and each [`Connection`] runs query text to completion, draining whatever rows come back.
use crate::error::ConnectionError;
use std::time::Duration;

/// Opens connections to the system under test.
///
/// `connect` is called once for the pre-flight check and once per worker.
#[trait_variant::make(Connector: Send)]
pub trait LocalConnector {
    type Connection: Connection + Send + 'static;

    async fn connect(&self) -> Result<Self::Connection, ConnectionError>;
}

/// A dedicated connection owned by exactly one worker.
#[trait_variant::make(Connection: Send)]
pub trait LocalConnection {
    /// Run `query` and consume every result row. Returns the number of rows drained.
    async fn execute(&mut self, query: &str) -> Result<u64, ConnectionError>;

    async fn close(self) -> Result<(), ConnectionError>;
}

/// Open a connection, giving up after `timeout`.
pub(crate) async fn connect_within<C>(
    connector: &C,
    timeout: Duration,
) -> Result<C::Connection, ConnectionError>
where
    C: Connector,
{
    tokio::time::timeout(timeout, connector.connect())
        .await
        .map_err(|_| ConnectionError::Timeout(timeout))?
}

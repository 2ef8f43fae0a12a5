// Miner client over the D-Bus system bus

use super::client::{AssertLocationCall, MinerClient, MinerEndpoint, RpcError};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;
use zbus::Connection;

/// Calls `AssertLocation` on the miner's bus object.
///
/// The system bus connection is opened on first use, so a bus that is down at
/// startup shows up as a failed call rather than a failed construction. zbus
/// multiplexes concurrent calls over the one connection.
pub struct DbusMinerClient {
    connection: OnceCell<Connection>,
    endpoint: MinerEndpoint,
}

impl DbusMinerClient {
    /// Client for the miner on the system bus
    pub fn system(endpoint: MinerEndpoint) -> Self {
        Self {
            connection: OnceCell::new(),
            endpoint,
        }
    }

    /// Client over an already established connection
    pub fn with_connection(connection: Connection, endpoint: MinerEndpoint) -> Self {
        Self {
            connection: OnceCell::new_with(Some(connection)),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &MinerEndpoint {
        &self.endpoint
    }

    async fn connection(&self) -> Result<&Connection, RpcError> {
        self.connection
            .get_or_try_init(|| async {
                debug!("Connecting to system bus");
                Connection::system().await.map_err(RpcError::from)
            })
            .await
    }
}

#[async_trait]
impl MinerClient for DbusMinerClient {
    async fn assert_location(&self, call: &AssertLocationCall) -> Result<Vec<u8>, RpcError> {
        debug!(
            "Calling {}.{} on {} (index {})",
            self.endpoint.interface, self.endpoint.method, self.endpoint.destination, call.index
        );

        let reply = self
            .connection()
            .await?
            .call_method(
                Some(self.endpoint.destination.as_str()),
                self.endpoint.path.as_str(),
                Some(self.endpoint.interface.as_str()),
                self.endpoint.method.as_str(),
                &call.args(),
            )
            .await?;

        let body = reply.body();
        let (txn,): (Vec<u8>,) = body
            .deserialize()
            .map_err(|e| RpcError::InvalidReply(e.to_string()))?;
        Ok(txn)
    }
}

/// Error replies keep their name. Only failures to reach the bus count as
/// `Bus`; anything else zbus reports is about the message itself.
impl From<zbus::Error> for RpcError {
    fn from(err: zbus::Error) -> Self {
        match err {
            zbus::Error::MethodError(name, message, _) => RpcError::Remote {
                name: name.to_string(),
                message,
            },
            err @ (zbus::Error::InputOutput(_)
            | zbus::Error::Address(_)
            | zbus::Error::Handshake(_)) => RpcError::Bus(err.to_string()),
            other => RpcError::InvalidReply(other.to_string()),
        }
    }
}

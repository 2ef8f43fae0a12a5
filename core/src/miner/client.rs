// Miner client seam
//
// The miner builds and signs the assert-location transaction; this side only
// supplies the arguments and hands back whatever bytes it returns.

use crate::geo::GeoIndex;
use crate::message::AssertLocationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Default bus name, object and interface of the miner service
pub const MINER_DESTINATION: &str = "com.helium.Miner";
pub const MINER_OBJECT_PATH: &str = "/";
pub const MINER_INTERFACE: &str = "com.helium.Miner";
pub const ASSERT_LOCATION_METHOD: &str = "AssertLocation";

#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// The call reached the bus and came back as an error reply.
    /// `name` is the opaque error identifier; it is not interpreted here.
    #[error("Remote error {name}")]
    Remote {
        name: String,
        message: Option<String>,
    },
    #[error("No reply within {0:?}")]
    Timeout(Duration),
    #[error("Bus error: {0}")]
    Bus(String),
    #[error("Unexpected reply: {0}")]
    InvalidReply(String),
}

/// Where the assert-location method lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerEndpoint {
    /// Well-known bus name
    pub destination: String,
    /// Object path
    pub path: String,
    /// Interface name
    pub interface: String,
    /// Method name
    pub method: String,
}

impl Default for MinerEndpoint {
    fn default() -> Self {
        Self {
            destination: MINER_DESTINATION.to_string(),
            path: MINER_OBJECT_PATH.to_string(),
            interface: MINER_INTERFACE.to_string(),
            method: ASSERT_LOCATION_METHOD.to_string(),
        }
    }
}

/// Arguments for one assert-location call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertLocationCall {
    pub index: String,
    pub owner: String,
    pub nonce: u64,
    pub amount: u64,
    pub fee: u64,
    pub payer: String,
}

impl AssertLocationCall {
    pub fn new(index: &GeoIndex, request: &AssertLocationRequest) -> Self {
        Self {
            index: index.to_string(),
            owner: request.owner.clone(),
            nonce: request.nonce,
            amount: request.amount,
            fee: request.fee,
            payer: request.payer.clone(),
        }
    }

    /// Positional argument list: (index, owner, nonce, amount, fee, payer).
    ///
    /// Note amount comes before fee here, unlike the request's field order.
    pub fn args(&self) -> (&str, &str, u64, u64, u64, &str) {
        (
            &self.index,
            &self.owner,
            self.nonce,
            self.amount,
            self.fee,
            &self.payer,
        )
    }
}

/// Remote service that turns an assert-location call into transaction bytes.
///
/// One call per write, no retries. Implementations may block for a while;
/// callers bound them with a timeout.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MinerClient: Send + Sync {
    async fn assert_location(&self, call: &AssertLocationCall) -> Result<Vec<u8>, RpcError>;
}

// Miner module: the assert-location RPC and the wire tokens its failures map to
//
// - **client**: `MinerClient` seam, call arguments and the endpoint address
// - **dbus**: `MinerClient` over the D-Bus system bus
// - **status**: classification of RPC failures and the bytes readers see

pub mod client;
pub mod dbus;
pub mod status;

pub use client::{AssertLocationCall, MinerClient, MinerEndpoint, RpcError};
pub use dbus::DbusMinerClient;
pub use status::{RemoteFailure, RemoteOutcome, WireStatus};

#[cfg(test)]
pub use client::MockMinerClient;

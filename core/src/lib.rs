// GeoAssert Core: Assert Location characteristic
//
// A BLE peripheral exposes one characteristic that accepts a protobuf
// location-assertion request, turns the coordinates into an H3 cell, asks the
// miner (over the system bus) to build the transaction, and serves the result
// back to readers and subscribers.

#![allow(clippy::empty_line_after_doc_comments)]

pub mod ble;
pub mod geo;
pub mod message;
pub mod miner;

pub use ble::{
    AssertLocationCharacteristic, ChannelNotifier, CharacteristicProperty, Descriptor,
    NotificationSink, ValueChanged,
};
pub use geo::{index, GeoIndex, IndexError, H3_RESOLUTION};
pub use message::{decode_request, encode_request, AssertLocationRequest, DecodeError};
pub use miner::{
    AssertLocationCall, DbusMinerClient, MinerClient, MinerEndpoint, RemoteFailure,
    RemoteOutcome, RpcError, WireStatus,
};

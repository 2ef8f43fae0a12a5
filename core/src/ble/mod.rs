/// BLE GATT module
///
/// Everything the peripheral side needs to expose the Assert Location
/// characteristic:
///
/// - **gatt**: UUIDs, properties, static descriptors, offset reads and the
///   notification sink the hosting BLE stack implements
/// - **assert_location**: the characteristic itself (cached value,
///   subscription flag, write pipeline)
///
/// Service registration and advertising belong to the platform BLE stack
/// (BlueZ on the gateway). This module is testable without BLE hardware.

pub mod assert_location;
pub mod gatt;

pub use assert_location::{AssertLocationCharacteristic, DEFAULT_RPC_TIMEOUT};
pub use gatt::{
    read_at_offset, ChannelNotifier, CharacteristicProperty, Descriptor, NotificationSink,
    ValueChanged, ASSERT_LOCATION_CHARACTERISTIC_UUID, CONFIG_SERVICE_UUID,
};

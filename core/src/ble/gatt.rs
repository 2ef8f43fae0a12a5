/// GATT definitions for the gateway configuration service
///
/// UUIDs, characteristic properties, the static descriptors advertised next
/// to a characteristic, ATT offset reads, and the notification seam.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::trace;
use uuid::Uuid;

/// Gateway configuration service
pub const CONFIG_SERVICE_UUID: Uuid = Uuid::from_u128(0x0fda92b2_44a2_4af2_84f5_fa682baa2b8d);

/// Assert Location characteristic
pub const ASSERT_LOCATION_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0xd435f5de_01a4_4e7d_84ba_dfd347f60275);

/// Characteristic User Description descriptor (0x2901)
pub const USER_DESCRIPTION_UUID: u16 = 0x2901;

/// Characteristic Presentation Format descriptor (0x2904)
pub const PRESENTATION_FORMAT_UUID: u16 = 0x2904;

/// Presentation format code for an opaque structure
const FORMAT_OPAQUE_STRUCT: u8 = 0x1B;

/// Characteristic properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacteristicProperty {
    Read,
    Write,
    Notify,
}

impl CharacteristicProperty {
    /// Flag name as BlueZ expects it in `GattCharacteristic1.Flags`
    pub fn flag(&self) -> &'static str {
        match self {
            CharacteristicProperty::Read => "read",
            CharacteristicProperty::Write => "write",
            CharacteristicProperty::Notify => "notify",
        }
    }
}

/// Static, read-only descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// 16-bit SIG-assigned descriptor UUID
    pub uuid: u16,
    pub value: Vec<u8>,
}

impl Descriptor {
    /// Human-readable label (0x2901), UTF-8
    pub fn user_description(text: &str) -> Self {
        Self {
            uuid: USER_DESCRIPTION_UUID,
            value: text.as_bytes().to_vec(),
        }
    }

    /// Presentation format (0x2904) marking the value as an opaque structure:
    /// [format | exponent | unit: u16 LE | namespace | description: u16 LE]
    pub fn opaque_structure() -> Self {
        Self {
            uuid: PRESENTATION_FORMAT_UUID,
            value: vec![FORMAT_OPAQUE_STRUCT, 0x00, 0x00, 0x27, 0x01, 0x00, 0x00],
        }
    }
}

/// Suffix of `value` starting at `offset`.
///
/// An offset at or past the end yields an empty slice instead of an error;
/// offsets come from untrusted peers.
pub fn read_at_offset(value: &[u8], offset: usize) -> &[u8] {
    value.get(offset..).unwrap_or_default()
}

/// Push of a new characteristic value to subscribed centrals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChanged {
    /// Object path of the characteristic
    pub path: String,
    pub value: Vec<u8>,
}

/// Notification seam implemented by the hosting BLE stack.
///
/// Fire-and-forget: delivery failures are the stack's concern. Called while
/// the characteristic holds its state lock, so implementations must not call
/// back into the characteristic.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, path: &str, value: &[u8]);
}

/// Forwards notifications into a tokio channel for a BLE stack task to drain
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<ValueChanged>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ValueChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, path: &str, value: &[u8]) {
        let event = ValueChanged {
            path: path.to_string(),
            value: value.to_vec(),
        };
        if self.tx.send(event).is_err() {
            trace!("Notification receiver dropped, discarding value for {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characteristic_uuids() {
        assert_eq!(
            CONFIG_SERVICE_UUID.to_string(),
            "0fda92b2-44a2-4af2-84f5-fa682baa2b8d"
        );
        assert_eq!(
            ASSERT_LOCATION_CHARACTERISTIC_UUID.to_string(),
            "d435f5de-01a4-4e7d-84ba-dfd347f60275"
        );
    }

    #[test]
    fn test_property_flags() {
        let flags: Vec<_> = [
            CharacteristicProperty::Read,
            CharacteristicProperty::Write,
            CharacteristicProperty::Notify,
        ]
        .iter()
        .map(|p| p.flag())
        .collect();
        assert_eq!(flags, vec!["read", "write", "notify"]);
    }

    #[test]
    fn test_user_description_descriptor() {
        let descriptor = Descriptor::user_description("Assert Location");
        assert_eq!(descriptor.uuid, 0x2901);
        assert_eq!(descriptor.value, b"Assert Location");
    }

    #[test]
    fn test_opaque_structure_descriptor() {
        let descriptor = Descriptor::opaque_structure();
        assert_eq!(descriptor.uuid, 0x2904);
        assert_eq!(descriptor.value.len(), 7);
        assert_eq!(descriptor.value[0], 0x1B);
    }

    #[test]
    fn test_read_at_offset() {
        let value = b"badargs";
        assert_eq!(read_at_offset(value, 0), b"badargs");
        assert_eq!(read_at_offset(value, 3), b"args");
        assert_eq!(read_at_offset(value, 7), b"");
        assert_eq!(read_at_offset(value, 512), b"");
    }

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify("/char0", b"wait");

        let event = rx.try_recv().expect("Notification queued");
        assert_eq!(event.path, "/char0");
        assert_eq!(event.value, b"wait");
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify("/char0", b"wait");
    }
}

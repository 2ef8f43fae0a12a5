// Assert Location characteristic
//
// Read / write / notify. A write carries an `AssertLocationRequest`; the
// resulting transaction (or a status token) becomes the characteristic value
// that centrals read back, optionally pushed to a subscriber.

use super::gatt::{
    read_at_offset, CharacteristicProperty, Descriptor, NotificationSink,
    ASSERT_LOCATION_CHARACTERISTIC_UUID,
};
use crate::geo;
use crate::message::decode_request;
use crate::miner::{AssertLocationCall, MinerClient, RemoteOutcome, RpcError, WireStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Upper bound on one miner call before the write resolves to `wait`
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

const PROPERTIES: &[CharacteristicProperty] = &[
    CharacteristicProperty::Read,
    CharacteristicProperty::Write,
    CharacteristicProperty::Notify,
];

const DESCRIPTION: &str = "Assert Location";

#[derive(Debug)]
struct State {
    value: Vec<u8>,
    notifying: bool,
}

/// The Assert Location characteristic.
///
/// Safe to share between BLE callbacks: reads see either the value before a
/// write or after it, never a mix, and writes are applied one at a time.
pub struct AssertLocationCharacteristic {
    path: String,
    miner: Arc<dyn MinerClient>,
    notifier: Arc<dyn NotificationSink>,
    rpc_timeout: Duration,
    state: RwLock<State>,
    write_gate: tokio::sync::Mutex<()>,
}

impl AssertLocationCharacteristic {
    /// Create the characteristic with its value at the `init` sentinel and
    /// notifications off. `path` addresses notifications.
    pub fn new(
        path: impl Into<String>,
        miner: Arc<dyn MinerClient>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            path: path.into(),
            miner,
            notifier,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            state: RwLock::new(State {
                value: WireStatus::Init.into_bytes(),
                notifying: false,
            }),
            write_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn uuid() -> Uuid {
        ASSERT_LOCATION_CHARACTERISTIC_UUID
    }

    pub fn properties() -> &'static [CharacteristicProperty] {
        PROPERTIES
    }

    /// Label and opaque-structure presentation format
    pub fn descriptors() -> Vec<Descriptor> {
        vec![
            Descriptor::user_description(DESCRIPTION),
            Descriptor::opaque_structure(),
        ]
    }

    pub fn is_notifying(&self) -> bool {
        self.state.read().notifying
    }

    /// Value suffix from `offset`; empty once `offset` reaches the end
    pub fn read(&self, offset: usize) -> Vec<u8> {
        let state = self.state.read();
        read_at_offset(&state.value, offset).to_vec()
    }

    /// Run one write through decode, index and miner call, and store the
    /// outcome as the new value.
    ///
    /// Never fails: every error becomes a status token in the value. Emits at
    /// most one notification, and only while notifying.
    pub async fn write(&self, payload: &[u8]) -> WireStatus {
        let _serial = self.write_gate.lock().await;

        let status = self.resolve(payload).await;
        info!(
            "Assert location resolved to {} ({} bytes)",
            status.token().unwrap_or("transaction"),
            status.as_bytes().len()
        );
        self.store(status.as_bytes());
        status
    }

    /// Subscribe. Pushes the current value once so a late subscriber is in
    /// sync; a no-op when already notifying.
    pub fn start_notify(&self) {
        let mut state = self.state.write();
        if state.notifying {
            debug!("Already notifying on {}", self.path);
            return;
        }
        state.notifying = true;
        info!("Notifications enabled on {}", self.path);
        self.notifier.notify(&self.path, &state.value);
    }

    pub fn stop_notify(&self) {
        let mut state = self.state.write();
        if !state.notifying {
            debug!("Not notifying on {}", self.path);
            return;
        }
        state.notifying = false;
        info!("Notifications disabled on {}", self.path);
    }

    async fn resolve(&self, payload: &[u8]) -> WireStatus {
        let request = match decode_request(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejecting assert location write: {}", e);
                return WireStatus::BadArgs;
            }
        };

        let index = match geo::index(request.lat, request.lon) {
            Ok(index) => index,
            Err(e) => {
                warn!("Rejecting assert location write: {}", e);
                return WireStatus::BadArgs;
            }
        };
        debug!(
            "Asserting ({}, {}) as {} nonce={}",
            request.lat, request.lon, index, request.nonce
        );

        let call = AssertLocationCall::new(&index, &request);
        let result =
            match tokio::time::timeout(self.rpc_timeout, self.miner.assert_location(&call)).await
            {
                Ok(result) => result,
                Err(_) => Err(RpcError::Timeout(self.rpc_timeout)),
            };
        if let Err(e) = &result {
            warn!("Miner assert location failed: {}", e);
        }

        WireStatus::from(RemoteOutcome::from(result))
    }

    fn store(&self, value: &[u8]) {
        let mut state = self.state.write();
        state.value = value.to_vec();
        if state.notifying {
            self.notifier.notify(&self.path, &state.value);
        }
    }
}

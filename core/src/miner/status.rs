// Failure classification and wire status tokens
//
// Semantic outcomes never surface as a failed BLE write. They are encoded in
// the characteristic value instead, as one of a handful of ASCII tokens.

use super::client::RpcError;

/// Bus daemon reply when the miner's name has no owner
pub const SERVICE_UNKNOWN: &str = "org.freedesktop.DBus.Error.ServiceUnknown";
/// Miner rejected the arguments
pub const MINER_BAD_ARGS: &str = "com.helium.Miner.BadArgs";
/// Miner failed internally
pub const MINER_ERROR: &str = "com.helium.Miner.Error";

/// Why an assert-location call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// Miner not reachable (not running, bus unreachable, or timed out)
    ServiceUnavailable,
    BadArguments,
    InternalError,
    /// Any identifier not listed above, kept for logging
    Unknown(String),
}

impl RemoteFailure {
    /// Map a remote error identifier onto the closed set
    pub fn from_error_name(name: &str) -> Self {
        match name {
            SERVICE_UNKNOWN => RemoteFailure::ServiceUnavailable,
            MINER_BAD_ARGS => RemoteFailure::BadArguments,
            MINER_ERROR => RemoteFailure::InternalError,
            other => RemoteFailure::Unknown(other.to_string()),
        }
    }

    pub fn classify(err: &RpcError) -> Self {
        match err {
            RpcError::Remote { name, .. } => Self::from_error_name(name),
            RpcError::Timeout(_) | RpcError::Bus(_) => RemoteFailure::ServiceUnavailable,
            RpcError::InvalidReply(reason) => RemoteFailure::Unknown(reason.clone()),
        }
    }

    pub fn wire_status(&self) -> WireStatus {
        match self {
            RemoteFailure::ServiceUnavailable => WireStatus::Wait,
            RemoteFailure::BadArguments => WireStatus::BadArgs,
            RemoteFailure::InternalError => WireStatus::Error,
            RemoteFailure::Unknown(_) => WireStatus::Unknown,
        }
    }
}

/// Result of one assert-location call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Success(Vec<u8>),
    Failure(RemoteFailure),
}

impl From<Result<Vec<u8>, RpcError>> for RemoteOutcome {
    fn from(result: Result<Vec<u8>, RpcError>) -> Self {
        match result {
            Ok(txn) => RemoteOutcome::Success(txn),
            Err(err) => RemoteOutcome::Failure(RemoteFailure::classify(&err)),
        }
    }
}

/// Value held by the characteristic and returned to readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireStatus {
    /// Nothing written yet
    Init,
    /// Transaction bytes returned by the miner
    Transaction(Vec<u8>),
    /// Miner unreachable, try again later
    Wait,
    /// Payload did not decode, or the miner rejected its arguments
    BadArgs,
    /// Miner internal error
    Error,
    Unknown,
}

impl WireStatus {
    /// Fixed token for every non-transaction status
    pub fn token(&self) -> Option<&'static str> {
        match self {
            WireStatus::Init => Some("init"),
            WireStatus::Transaction(_) => None,
            WireStatus::Wait => Some("wait"),
            WireStatus::BadArgs => Some("badargs"),
            WireStatus::Error => Some("error"),
            WireStatus::Unknown => Some("unknown"),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            WireStatus::Transaction(txn) => txn.as_slice(),
            other => other.token().map(str::as_bytes).unwrap_or_default(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            WireStatus::Transaction(txn) => txn,
            other => other.as_bytes().to_vec(),
        }
    }
}

impl From<RemoteOutcome> for WireStatus {
    fn from(outcome: RemoteOutcome) -> Self {
        match outcome {
            RemoteOutcome::Success(txn) => WireStatus::Transaction(txn),
            RemoteOutcome::Failure(failure) => failure.wire_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn remote(name: &str) -> RpcError {
        RpcError::Remote {
            name: name.to_string(),
            message: None,
        }
    }

    #[test]
    fn test_error_name_table() {
        let cases = [
            (SERVICE_UNKNOWN, "wait"),
            (MINER_BAD_ARGS, "badargs"),
            (MINER_ERROR, "error"),
            ("org.freedesktop.DBus.Error.AccessDenied", "unknown"),
            ("org.freedesktop.DBus.Error.NoReply", "unknown"),
            ("", "unknown"),
        ];

        for (name, token) in cases {
            let status = RemoteFailure::from_error_name(name).wire_status();
            assert_eq!(status.as_bytes(), token.as_bytes(), "identifier {name:?}");
        }
    }

    #[test]
    fn test_unknown_keeps_identifier() {
        assert_eq!(
            RemoteFailure::from_error_name("com.helium.Miner.Busy"),
            RemoteFailure::Unknown("com.helium.Miner.Busy".to_string())
        );
    }

    #[test]
    fn test_transport_failures_are_unavailable() {
        assert_eq!(
            RemoteFailure::classify(&RpcError::Timeout(Duration::from_secs(10))),
            RemoteFailure::ServiceUnavailable
        );
        assert_eq!(
            RemoteFailure::classify(&RpcError::Bus("connection refused".into())),
            RemoteFailure::ServiceUnavailable
        );
    }

    #[test]
    fn test_other_bus_daemon_errors_are_unknown() {
        let no_reply = "org.freedesktop.DBus.Error.NoReply";
        assert_eq!(
            RemoteFailure::classify(&remote(no_reply)),
            RemoteFailure::Unknown(no_reply.to_string())
        );
        assert_eq!(
            RemoteFailure::from_error_name(no_reply).wire_status(),
            WireStatus::Unknown
        );
    }

    #[test]
    fn test_invalid_reply_is_unknown() {
        let outcome = RemoteOutcome::from(Err(RpcError::InvalidReply("signature s".into())));
        assert_eq!(WireStatus::from(outcome), WireStatus::Unknown);
    }

    #[test]
    fn test_success_passes_bytes_through() {
        let outcome = RemoteOutcome::from(Ok(b"txn".to_vec()));
        let status = WireStatus::from(outcome);
        assert_eq!(status.token(), None);
        assert_eq!(status.into_bytes(), b"txn".to_vec());
    }

    #[test]
    fn test_init_sentinel() {
        assert_eq!(WireStatus::Init.as_bytes(), b"init");
    }
}

// Request codec: protobuf decode with a size ceiling

use super::types::AssertLocationRequest;
use prost::Message;
use thiserror::Error;

/// Largest write payload accepted: the ATT maximum attribute value length.
pub const MAX_REQUEST_SIZE: usize = 512;

#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Request too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },
    #[error("Malformed request: {0}")]
    Malformed(#[from] prost::DecodeError),
}

/// Decode a characteristic write into an [`AssertLocationRequest`].
///
/// Truncated buffers, wrong wire types and non-UTF-8 address strings are all
/// rejected. An empty buffer is a valid (all-default) message.
pub fn decode_request(bytes: &[u8]) -> Result<AssertLocationRequest, DecodeError> {
    if bytes.len() > MAX_REQUEST_SIZE {
        return Err(DecodeError::TooLarge {
            len: bytes.len(),
            max: MAX_REQUEST_SIZE,
        });
    }

    Ok(AssertLocationRequest::decode(bytes)?)
}

/// Encode a request into its wire form
pub fn encode_request(request: &AssertLocationRequest) -> Vec<u8> {
    request.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssertLocationRequest {
        AssertLocationRequest {
            lat: 10.0,
            lon: 11.0,
            owner: "14GWyFj9FjLHzoN3aX7Tq7PL6fEg4dfWPY8CrK8b9S5ZrcKDz6S".into(),
            nonce: 1,
            fee: 65000,
            amount: 1000000,
            payer: "13Zni1he7KY9pUmkXMhEhTwfUpL9AcEV1m2UbbvFsrU9QPTMgE3".into(),
        }
    }

    #[test]
    fn test_request_roundtrip() {
        let request = sample();
        let bytes = encode_request(&request);
        let restored = decode_request(&bytes).unwrap();

        assert_eq!(request, restored);
    }

    #[test]
    fn test_reject_non_protobuf_text() {
        // 'i' opens a fixed64 field that the remaining six bytes cannot fill
        let result = decode_request(b"invalid");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_reject_truncated() {
        let bytes = encode_request(&sample());
        let result = decode_request(&bytes[..bytes.len() - 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_non_utf8_owner() {
        // tag 3, length-delimited, 2 bytes of invalid UTF-8
        let bytes = [0x1A, 0x02, 0xC3, 0x28];
        assert!(decode_request(&bytes).is_err());
    }

    #[test]
    fn test_reject_oversized_decode() {
        let big_bytes = vec![0u8; MAX_REQUEST_SIZE + 1];
        let result = decode_request(&big_bytes);
        assert!(matches!(
            result,
            Err(DecodeError::TooLarge { len, max }) if len == MAX_REQUEST_SIZE + 1 && max == MAX_REQUEST_SIZE
        ));
    }

    #[test]
    fn test_empty_payload_is_default_request() {
        let request = decode_request(&[]).unwrap();
        assert_eq!(request, AssertLocationRequest::default());
    }
}

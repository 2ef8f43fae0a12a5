// Message module: the assert-location write payload and its codec

pub mod types;
pub mod codec;

pub use types::AssertLocationRequest;
pub use codec::{decode_request, encode_request, DecodeError, MAX_REQUEST_SIZE};

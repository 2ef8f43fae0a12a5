// Assert-location request: the protobuf body a phone writes to the characteristic

/// Location assertion as written by the companion app.
///
/// Wire schema (`assert_loc_v1`):
///
/// | tag | field  | type   |
/// |-----|--------|--------|
/// | 1   | lat    | double |
/// | 2   | lon    | double |
/// | 3   | owner  | string |
/// | 4   | nonce  | uint64 |
/// | 5   | fee    | uint64 |
/// | 6   | amount | uint64 |
/// | 7   | payer  | string |
///
/// Lives only for one write; the miner call consumes its fields.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AssertLocationRequest {
    /// Latitude in degrees
    #[prost(double, tag = "1")]
    pub lat: f64,
    /// Longitude in degrees
    #[prost(double, tag = "2")]
    pub lon: f64,
    /// Owner wallet address (b58)
    #[prost(string, tag = "3")]
    pub owner: String,
    /// Assert nonce for this gateway
    #[prost(uint64, tag = "4")]
    pub nonce: u64,
    /// Transaction fee in data credits
    #[prost(uint64, tag = "5")]
    pub fee: u64,
    /// Staking amount in data credits
    #[prost(uint64, tag = "6")]
    pub amount: u64,
    /// Payer wallet address (b58), may equal owner
    #[prost(string, tag = "7")]
    pub payer: String,
}

// Geospatial index: (lat, lon) to a fixed-resolution H3 cell

use h3o::{CellIndex, LatLng, Resolution};
use std::fmt;
use thiserror::Error;

/// Resolution every asserted location is indexed at.
///
/// Resolution 12 cells average ~307 m², which is what the miner expects in
/// an assert-location transaction.
pub const H3_RESOLUTION: Resolution = Resolution::Twelve;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("Coordinate is not finite: lat={lat}, lon={lon}")]
    NotFinite { lat: f64, lon: f64 },
    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),
    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// H3 cell identifying an asserted location.
///
/// Renders as the canonical lowercase hex string (e.g. `8c754e64992d7ff`),
/// which is the form passed to the miner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoIndex(CellIndex);

impl GeoIndex {
    pub fn cell(&self) -> CellIndex {
        self.0
    }

    pub fn resolution(&self) -> Resolution {
        self.0.resolution()
    }
}

impl fmt::Display for GeoIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index a coordinate (degrees) at [`H3_RESOLUTION`].
///
/// Out-of-range or non-finite input is rejected rather than wrapped, so a
/// bad coordinate can never be asserted as some other cell.
pub fn index(lat: f64, lon: f64) -> Result<GeoIndex, IndexError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(IndexError::NotFinite { lat, lon });
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(IndexError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(IndexError::LongitudeOutOfRange(lon));
    }

    let coord =
        LatLng::new(lat, lon).map_err(|e| IndexError::InvalidCoordinate(e.to_string()))?;
    Ok(GeoIndex(coord.to_cell(H3_RESOLUTION)))
}

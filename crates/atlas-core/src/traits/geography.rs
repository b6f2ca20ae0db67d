use crate::errors::AtlasResult;
use crate::models::GeoDistance;

/// Read-only province distance reference data.
pub trait IGeographyTable: Send + Sync {
    /// Distance between two provinces, in either argument order.
    fn distance(&self, a: &str, b: &str) -> AtlasResult<Option<GeoDistance>>;
}

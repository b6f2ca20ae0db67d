use serde::{Deserialize, Serialize};

/// Symmetric distance between two provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoDistance {
    pub km: u32,
    pub is_neighbor: bool,
}

use geo::MultiPolygon;

use super::CircuitKey;

/// One row of the results CSV, reduced to the fields the pipeline uses.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteRecord {
    pub district: String,
    pub circuit_id: CircuitKey,
    pub office: String,
    pub party: String,
    pub vote_count: u64,
}

/// One feature of the circuit boundary layer.
#[derive(Clone, Debug)]
pub struct CircuitGeometry {
    pub circuit_id: CircuitKey,
    /// Raw identifier as published, before normalization.
    pub raw_id: String,
    pub head_locality: String,
    pub district_subdivision: String,
    pub polygon: MultiPolygon<f64>,
}

/// Both parsed sources, held together by the dashboard.
#[derive(Clone, Debug, Default)]
pub struct Datasets {
    pub votes: Vec<VoteRecord>,
    pub circuits: Vec<CircuitGeometry>,
}

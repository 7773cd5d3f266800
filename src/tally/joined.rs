use ahash::AHashSet;
use geo::MultiPolygon;
use serde::Serialize;

use super::{Aggregation, CircuitResult};
use crate::{error::{Error, Result}, types::{CircuitGeometry, CircuitKey}};

/// How many circuits survived the inner join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JoinSummary {
    pub matched: usize,
    pub votes_without_geometry: usize,
    pub geometry_without_votes: usize,
}

impl JoinSummary {
    /// Circuits dropped from either side.
    pub fn dropped(&self) -> usize { self.votes_without_geometry + self.geometry_without_votes }
}

/// A circuit with both results and a boundary.
#[derive(Clone, Debug)]
pub struct JoinedCircuit {
    pub result: CircuitResult,
    pub head_locality: String,
    pub district_subdivision: String,
    pub polygon: MultiPolygon<f64>,
}

impl JoinedCircuit {
    pub fn circuit_id(&self) -> &CircuitKey { &self.result.circuit_id }
}

/// Inner join of aggregated results with circuit boundaries on the normalized
/// key, in key order. Boundaries sharing a key are merged into one
/// multipolygon; the first one's locality names are kept.
pub fn join(aggregation: Aggregation, geometries: &[&CircuitGeometry]) -> Result<(Vec<JoinedCircuit>, JoinSummary)> {
    let mut circuits = aggregation.into_circuits();
    let votes = circuits.len();

    let mut joined: Vec<JoinedCircuit> = Vec::new();
    let mut seen = AHashSet::new();
    let mut summary = JoinSummary::default();

    let mut ordered = geometries.to_vec();
    ordered.sort_by(|a, b| a.circuit_id.cmp(&b.circuit_id));

    for geometry in ordered {
        let key = &geometry.circuit_id;
        if let Some(last) = joined.last_mut().filter(|last| last.circuit_id() == key) {
            last.polygon.0.extend(geometry.polygon.0.iter().cloned());
            continue;
        }
        if !seen.insert(key.clone()) { continue }

        match circuits.remove(key) {
            Some(result) => joined.push(JoinedCircuit {
                result,
                head_locality: geometry.head_locality.clone(),
                district_subdivision: geometry.district_subdivision.clone(),
                polygon: geometry.polygon.clone(),
            }),
            None => summary.geometry_without_votes += 1,
        }
    }

    summary.matched = joined.len();
    summary.votes_without_geometry = circuits.len();

    if summary.dropped() > 0 {
        log::warn!(
            "[tally::join] dropped {} circuit(s) with votes but no boundary and {} boundary(ies) without votes",
            summary.votes_without_geometry, summary.geometry_without_votes,
        );
    }
    if joined.is_empty() && (votes > 0 || !seen.is_empty()) {
        return Err(Error::JoinMismatch { votes, geometries: seen.len() });
    }
    Ok((joined, summary))
}

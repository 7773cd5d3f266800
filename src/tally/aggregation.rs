use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{CircuitKey, VoteRecord};

/// Which vote rows take part in an aggregation.
#[derive(Clone, Debug, Default)]
pub struct VoteFilter<'a> {
    pub office: &'a str,
    pub district: Option<&'a str>,
    pub circuit: Option<&'a CircuitKey>,
}

impl VoteFilter<'_> {
    pub(crate) fn accepts(&self, record: &VoteRecord) -> bool {
        record.office == self.office
            && self.district.is_none_or(|district| record.district == district)
            && self.circuit.is_none_or(|circuit| &record.circuit_id == circuit)
    }
}

/// Votes for one party within one circuit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircuitTally {
    pub circuit_id: CircuitKey,
    pub party: String,
    pub votes: u64,
    pub circuit_total: u64,
    /// `100 * votes / circuit_total`, or `0.0` when the circuit has no votes.
    pub percentage: f64,
}

/// All party tallies of one circuit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircuitResult {
    pub circuit_id: CircuitKey,
    pub total: u64,
    /// Sorted by party name.
    pub tallies: Vec<CircuitTally>,
    /// Party with the most votes; `None` when the circuit has no votes.
    pub dominant: Option<String>,
}

impl CircuitResult {
    fn new(circuit_id: CircuitKey, votes_by_party: BTreeMap<String, u64>) -> Self {
        let total = votes_by_party.values().sum();
        let tallies = votes_by_party.into_iter()
            .map(|(party, votes)| CircuitTally {
                circuit_id: circuit_id.clone(),
                party,
                votes,
                circuit_total: total,
                percentage: percentage(votes, total),
            })
            .collect::<Vec<_>>();
        let dominant = dominant_party(&tallies).map(str::to_string);
        Self { circuit_id, total, tallies, dominant }
    }

    /// True when no votes were recorded, so percentages are all zero.
    pub fn is_degenerate(&self) -> bool { self.total == 0 }
}

/// `100 * part / total`, with an empty total giving `0.0`.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { 100.0 * part as f64 / total as f64 }
}

/// The party with the most votes. Ties go to the lexicographically smallest
/// party name; a circuit with no votes has no dominant party.
pub fn dominant_party(tallies: &[CircuitTally]) -> Option<&str> {
    tallies.iter()
        .filter(|tally| tally.votes > 0)
        .min_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.party.cmp(&b.party)))
        .map(|tally| tally.party.as_str())
}

/// Per-circuit results, ordered by circuit key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    circuits: BTreeMap<CircuitKey, CircuitResult>,
}

impl Aggregation {
    pub fn len(&self) -> usize { self.circuits.len() }

    pub fn is_empty(&self) -> bool { self.circuits.is_empty() }

    pub fn get(&self, key: &CircuitKey) -> Option<&CircuitResult> { self.circuits.get(key) }

    pub fn circuits(&self) -> impl Iterator<Item = &CircuitResult> { self.circuits.values() }

    /// Circuits whose vote total is zero.
    pub fn degenerate(&self) -> impl Iterator<Item = &CircuitKey> {
        self.circuits.values().filter(|c| c.is_degenerate()).map(|c| &c.circuit_id)
    }

    pub(crate) fn into_circuits(self) -> BTreeMap<CircuitKey, CircuitResult> { self.circuits }
}

/// Group the accepted records by (circuit, party) and sum their votes.
pub fn aggregate<'r>(records: impl IntoIterator<Item = &'r VoteRecord>, filter: &VoteFilter<'_>) -> Aggregation {
    let mut grouped: BTreeMap<CircuitKey, BTreeMap<String, u64>> = BTreeMap::new();
    let mut rows = 0usize;

    for record in records.into_iter().filter(|record| filter.accepts(record)) {
        *grouped.entry(record.circuit_id.clone()).or_default()
            .entry(record.party.clone()).or_default() += record.vote_count;
        rows += 1;
    }

    let circuits = grouped.into_iter()
        .map(|(key, parties)| (key.clone(), CircuitResult::new(key, parties)))
        .collect::<BTreeMap<_, _>>();

    log::debug!("[tally::aggregate] {rows} rows for '{}' into {} circuits", filter.office, circuits.len());
    Aggregation { circuits }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(circuit: &str, party: &str, votes: u64) -> VoteRecord {
        VoteRecord {
            district: "Buenos Aires".into(),
            circuit_id: CircuitKey::new(circuit),
            office: "PRESIDENTE".into(),
            party: party.into(),
            vote_count: votes,
        }
    }

    fn presidente() -> VoteFilter<'static> {
        VoteFilter { office: "PRESIDENTE", ..Default::default() }
    }

    #[test]
    fn thirty_seventy_split() {
        let records = [record("001", "A", 30), record("001", "B", 70)];
        let agg = aggregate(&records, &presidente());
        let circuit = agg.get(&CircuitKey::new("1")).unwrap();
        assert_eq!(circuit.circuit_id.as_str(), "1");
        assert_eq!(circuit.total, 100);
        assert_eq!(circuit.tallies[0].percentage, 30.0);
        assert_eq!(circuit.tallies[1].percentage, 70.0);
        assert_eq!(circuit.dominant.as_deref(), Some("B"));
    }

    #[test]
    fn sums_rows_across_tables() {
        let records = [record("7", "A", 3), record("0007", "A", 4), record("7", "B", 1)];
        let agg = aggregate(&records, &presidente());
        assert_eq!(agg.len(), 1);
        let circuit = agg.get(&CircuitKey::new("7")).unwrap();
        assert_eq!(circuit.tallies[0].votes, 7);
        assert_eq!(circuit.total, 8);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let records = [
            record("1", "A", 1), record("1", "B", 1), record("1", "C", 1),
            record("2", "A", 17), record("2", "B", 4),
            record("3", "A", 999_999), record("3", "B", 1),
        ];
        let agg = aggregate(&records, &presidente());
        for circuit in agg.circuits() {
            let sum: f64 = circuit.tallies.iter().map(|t| t.percentage).sum();
            assert!((sum - 100.0).abs() < 1e-9, "circuit {} sums to {sum}", circuit.circuit_id);
        }
    }

    #[test]
    fn zero_total_is_degenerate_not_a_fault() {
        let records = [record("5", "A", 0), record("5", "B", 0), record("6", "A", 2)];
        let agg = aggregate(&records, &presidente());
        let circuit = agg.get(&CircuitKey::new("5")).unwrap();
        assert!(circuit.is_degenerate());
        assert!(circuit.tallies.iter().all(|t| t.percentage == 0.0));
        assert_eq!(circuit.dominant, None);
        assert_eq!(agg.degenerate().collect::<Vec<_>>(), vec![&CircuitKey::new("5")]);
    }

    #[test]
    fn ties_go_to_smallest_party_name() {
        let forward = [record("1", "ZETA", 10), record("1", "ALFA", 10), record("1", "MEDIO", 3)];
        let mut backward = forward.clone();
        backward.reverse();
        for records in [&forward[..], &backward[..]] {
            let agg = aggregate(records, &presidente());
            assert_eq!(agg.get(&CircuitKey::new("1")).unwrap().dominant.as_deref(), Some("ALFA"));
        }
    }

    #[test]
    fn filters_by_office_district_and_circuit() {
        let mut other_office = record("1", "A", 50);
        other_office.office = "GOBERNADOR".into();
        let mut other_district = record("1", "A", 60);
        other_district.district = "Córdoba".into();
        let records = [record("1", "A", 5), record("2", "A", 6), other_office, other_district];

        let agg = aggregate(&records, &presidente());
        assert_eq!(agg.get(&CircuitKey::new("1")).unwrap().total, 65);

        let key = CircuitKey::new("01");
        let filter = VoteFilter { office: "PRESIDENTE", district: Some("Buenos Aires"), circuit: Some(&key) };
        let agg = aggregate(&records, &filter);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.get(&key).unwrap().total, 5);
    }

    #[test]
    fn all_zero_circuit_is_one_key() {
        let records = [record("000", "A", 1), record("0", "B", 2), record("", "A", 3)];
        let agg = aggregate(&records, &presidente());
        assert_eq!(agg.len(), 1);
        let circuit = agg.get(&CircuitKey::new("")).unwrap();
        assert_eq!(circuit.total, 6);
        assert_eq!(circuit.dominant.as_deref(), Some("A"));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let records = [record("1", "A", 4), record("1", "B", 4), record("2", "C", 9), record("2", "A", 9)];
        let first = aggregate(&records, &presidente());
        for _ in 0..10 {
            assert_eq!(aggregate(&records, &presidente()), first);
        }
    }
}

use std::collections::BTreeSet;

use geo::{BoundingRect, Coord, Rect};
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use super::{Choice, Options, Selection};
use crate::{
    error::{Error, Result},
    io::{csv::write_csv_string, html, svg},
    tally::{aggregate, join, percentage, CircuitResult, JoinSummary, JoinedCircuit, VoteFilter},
    types::{CircuitKey, Datasets},
};

const MARGIN: f64 = 10.0;
const HEADER: f64 = 44.0;

/// District-wide votes for one party.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartyTotal {
    pub party: String,
    pub votes: u64,
    pub percentage: f64,
}

/// Everything one render produces: the joined circuits, the totals and what
/// was dropped along the way.
#[derive(Clone, Debug)]
pub struct Report {
    pub office: String,
    pub district: Choice,
    pub head_locality: Choice,
    pub circuit: Choice,
    /// Joined circuits in key order.
    pub circuits: Vec<JoinedCircuit>,
    /// Every party appearing in `circuits`, sorted by name.
    pub parties: Vec<String>,
    /// Totals over `circuits`, sorted by votes (descending) then name.
    pub totals: Vec<PartyTotal>,
    pub join: JoinSummary,
    /// Joined circuits with no votes at all.
    pub degenerate: Vec<CircuitKey>,
    /// Districts whose rows went into the aggregation.
    pub districts: Vec<String>,
}

/// JSON shape of a report: everything except the boundaries.
#[derive(Serialize)]
struct Summary<'a> {
    title: String,
    office: &'a str,
    district: Option<&'a str>,
    head_locality: Option<&'a str>,
    circuit: Option<&'a str>,
    districts: &'a [String],
    totals: &'a [PartyTotal],
    join: JoinSummary,
    degenerate: &'a [CircuitKey],
    circuits: Vec<CircuitSummary<'a>>,
}

#[derive(Serialize)]
struct CircuitSummary<'a> {
    head_locality: &'a str,
    district_subdivision: &'a str,
    #[serde(flatten)]
    result: &'a CircuitResult,
}

impl Report {
    /// Run normalize → aggregate → join → totals for one selection.
    pub fn build(data: &Datasets, selection: &Selection, options: &Options) -> Result<Self> {
        let office = match &selection.office {
            Some(office) if options.offices.contains(office) => office.clone(),
            Some(office) => return Err(Error::Selection { field: "office", value: office.clone() }),
            None => options.offices.first().cloned()
                .ok_or_else(|| Error::format("results CSV", "no vote rows were loaded"))?,
        };
        if let Choice::Only(district) = &selection.district {
            if !options.districts.contains(district) {
                return Err(Error::Selection { field: "district", value: district.clone() });
            }
        }
        if let Choice::Only(head) = &selection.head_locality {
            if !options.head_localities.contains(head) {
                return Err(Error::Selection { field: "head locality", value: head.clone() });
            }
        }
        let circuit = selection.circuit.as_option().map(CircuitKey::new);
        if let Choice::Only(raw) = &selection.circuit {
            if !options.has_circuit(raw) {
                return Err(Error::Selection { field: "circuit", value: raw.clone() });
            }
        }

        let geometries = data.circuits.iter()
            .filter(|c| selection.head_locality.as_option().is_none_or(|head| c.head_locality == head))
            .filter(|c| circuit.as_ref().is_none_or(|key| &c.circuit_id == key))
            .collect::<Vec<_>>();

        let filter = VoteFilter {
            office: &office,
            district: selection.district.as_option(),
            circuit: circuit.as_ref(),
        };
        let districts = data.votes.iter()
            .filter(|r| filter.accepts(r))
            .map(|r| r.district.as_str())
            .collect::<BTreeSet<_>>();
        if districts.len() > 1 {
            // Circuit ids are only unique within a district.
            log::warn!(
                "[dashboard::report] votes from {} districts share circuit keys; select a district to avoid mixing them",
                districts.len(),
            );
        }
        let districts = districts.into_iter().map(str::to_string).collect::<Vec<_>>();
        let aggregation = aggregate(&data.votes, &filter);
        let (circuits, summary) = join(aggregation, &geometries)?;

        let parties = circuits.iter()
            .flat_map(|c| c.result.tallies.iter().map(|t| t.party.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let totals = party_totals(&circuits, &parties);
        if totals.iter().all(|t| t.votes == 0) {
            return Err(Error::DivisionDegenerate { scope: format!("'{office}' in the selected circuits") });
        }

        let degenerate = circuits.iter()
            .filter(|c| c.result.is_degenerate())
            .map(|c| c.circuit_id().clone())
            .collect::<Vec<_>>();
        if !degenerate.is_empty() {
            log::warn!("[dashboard::report] {} circuit(s) with zero votes", degenerate.len());
        }

        log::info!("[dashboard::report] '{office}': {} circuits, {} parties", circuits.len(), parties.len());
        Ok(Self {
            office,
            district: selection.district.clone(),
            head_locality: selection.head_locality.clone(),
            circuit: selection.circuit.clone(),
            circuits,
            parties,
            totals,
            join: summary,
            degenerate,
            districts,
        })
    }

    /// Map title naming the active filters.
    pub fn title(&self) -> String {
        let head = self.head_locality.as_option().unwrap_or("Todas");
        let circuit = self.circuit.as_option().unwrap_or("Todos los Circuitos");
        let title = format!("Mapa de Circuitos en {head} ({}) - {circuit}", self.office);
        match self.district.as_option() {
            Some(district) => format!("{district}: {title}"),
            None => title,
        }
    }

    /// Circuit × party percentages, rounded to two decimals; absent parties are 0.
    pub fn percentage_table(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new(
            "circuito".into(),
            self.circuits.iter().map(|c| c.circuit_id().to_string()).collect::<Vec<_>>(),
        )];
        for party in &self.parties {
            let values = self.circuits.iter()
                .map(|c| {
                    c.result.tallies.iter()
                        .find(|t| &t.party == party)
                        .map_or(0.0, |t| round2(t.percentage))
                })
                .collect::<Vec<_>>();
            columns.push(Column::new(party.as_str().into(), values));
        }
        DataFrame::new(columns).map_err(|e| Error::format("table", e.to_string()))
    }

    /// Votes and share of the grand total per party.
    pub fn totals_table(&self) -> Result<DataFrame> {
        DataFrame::new(vec![
            Column::new("agrupacion".into(), self.totals.iter().map(|t| t.party.clone()).collect::<Vec<_>>()),
            Column::new("votos".into(), self.totals.iter().map(|t| t.votes).collect::<Vec<_>>()),
            Column::new("% de Votos".into(), self.totals.iter().map(|t| round2(t.percentage)).collect::<Vec<_>>()),
        ])
        .map_err(|e| Error::format("table", e.to_string()))
    }

    pub fn percentage_csv(&self) -> Result<String> { write_csv_string(&self.percentage_table()?) }

    pub fn totals_csv(&self) -> Result<String> { write_csv_string(&self.totals_table()?) }

    /// Titles, totals and per-circuit tallies as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let summary = Summary {
            title: self.title(),
            office: &self.office,
            district: self.district.as_option(),
            head_locality: self.head_locality.as_option(),
            circuit: self.circuit.as_option(),
            districts: &self.districts,
            totals: &self.totals,
            join: self.join,
            degenerate: &self.degenerate,
            circuits: self.circuits.iter()
                .map(|c| CircuitSummary {
                    head_locality: &c.head_locality,
                    district_subdivision: &c.district_subdivision,
                    result: &c.result,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&summary).map_err(|e| Error::format("report", e.to_string()))
    }

    /// Choropleth of the joined circuits, tinted by dominant party.
    pub fn to_svg(&self, width: f64) -> Result<String> {
        if !width.is_finite() || width <= 2.0 * MARGIN {
            return Err(Error::Selection { field: "width", value: width.to_string() });
        }
        let bounds = self.bounds()
            .ok_or_else(|| Error::format("map", "[dashboard::report] no geometry to draw"))?;

        let span = if bounds.width() > 0.0 { bounds.width() } else { 1.0 };
        let scale = (width - 2.0 * MARGIN) / span;
        let height = bounds.height() * scale + 2.0 * MARGIN + HEADER;

        // Map lon/lat -> SVG coords (preserve aspect, Y down)
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            let x = MARGIN + (coord.x - bounds.min().x) * scale;
            let y = HEADER + MARGIN + (bounds.max().y - coord.y) * scale;
            (x, y)
        };

        let shapes = self.circuits.iter()
            .map(|c| {
                let dominant = c.result.dominant.as_deref();
                let share = dominant
                    .and_then(|party| c.result.tallies.iter().find(|t| t.party == party))
                    .map_or(0.0, |t| t.percentage);
                let label = format!(
                    "Circuito {} · {} · {} ({share:.2}%)",
                    c.circuit_id(), c.head_locality, dominant.unwrap_or("sin votos"),
                );
                (&c.polygon, svg::party_color(dominant), label)
            })
            .collect::<Vec<_>>();

        let mut writer = svg::SvgStringWriter::new();
        writer.write_header(width, height, &bounds)?;
        writer.write_styles()?;
        writer.write_title(width, &self.title())?;
        svg::draw_polygons_with_fill(&mut writer, &shapes, &project)?;
        svg::draw_legend(&mut writer, &self.legend(), MARGIN, HEADER + MARGIN)?;
        writer.write_footer()?;
        writer.into_string()
    }

    /// Self-contained HTML page with the map and both tables.
    pub fn to_html(&self, width: f64) -> Result<String> {
        html::render_report(self, &self.to_svg(width)?)
    }

    /// One legend row per dominant party on the map.
    pub fn legend(&self) -> Vec<(String, svg::Rgb)> {
        self.circuits.iter()
            .map(|c| c.result.dominant.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|party| (party.unwrap_or("Sin votos").to_string(), svg::party_color(party)))
            .collect()
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        self.circuits.iter()
            .filter_map(|c| c.polygon.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
    }
}

fn party_totals(circuits: &[JoinedCircuit], parties: &[String]) -> Vec<PartyTotal> {
    let votes_for = |party: &str| -> u64 {
        circuits.iter()
            .flat_map(|c| c.result.tallies.iter())
            .filter(|t| t.party == party)
            .map(|t| t.votes)
            .sum()
    };
    let votes = parties.iter().map(|p| (p, votes_for(p.as_str()))).collect::<Vec<_>>();
    let grand_total = votes.iter().map(|(_, v)| v).sum();

    let mut totals = votes.into_iter()
        .map(|(party, votes)| PartyTotal { party: party.clone(), votes, percentage: percentage(votes, grand_total) })
        .collect::<Vec<_>>();
    totals.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.party.cmp(&b.party)));
    totals
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

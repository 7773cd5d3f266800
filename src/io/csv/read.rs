//! CSV reading operations.

use std::io::Cursor;

use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, StringChunked}};

use crate::{error::{Error, Result}, types::{CircuitKey, VoteRecord}};

const SOURCE: &str = "results CSV";

const DISTRICT_COLUMN: &str = "distrito_nombre";
const CIRCUIT_COLUMN: &str = "circuito_id";
const OFFICE_COLUMN: &str = "cargo_nombre";
const PARTY_COLUMN: &str = "agrupacion_nombre";
const VOTES_COLUMN: &str = "votos_cantidad";

const REQUIRED_COLUMNS: [&str; 5] = [DISTRICT_COLUMN, CIRCUIT_COLUMN, OFFICE_COLUMN, PARTY_COLUMN, VOTES_COLUMN];

/// How the results CSV is read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Parse at most this many data rows at a time, filtering each chunk
    /// before the next one is parsed.
    pub chunk_rows: Option<usize>,
    /// Keep only rows whose `distrito_nombre` equals this value.
    pub district: Option<String>,
}

/// Row counts gathered while loading votes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub chunks: usize,
    pub kept: usize,
    pub without_party: usize,
    pub without_votes: usize,
    pub other_district: usize,
}

/// Read vote rows from the raw results CSV.
///
/// Every column is read as a string so padded circuit ids keep their zeros
/// until normalization. Chunks are split on line boundaries, so quoted fields
/// must not contain newlines (the published file has none).
pub(crate) fn read_votes(bytes: &[u8], options: &LoadOptions) -> Result<(Vec<VoteRecord>, LoadStats)> {
    let (header, body) = split_header(bytes);
    check_header(header)?;

    let chunk_rows = options.chunk_rows.unwrap_or(usize::MAX).max(1);
    let district = options.district.as_deref();

    let mut records = Vec::new();
    let mut stats = LoadStats::default();
    let mut chunk = header.to_vec();
    let mut rows_in_chunk = 0;

    for line in body.split_inclusive(|&b| b == b'\n') {
        if line.iter().all(|b| b.is_ascii_whitespace()) { continue }
        chunk.extend_from_slice(line);
        if !line.ends_with(b"\n") { chunk.push(b'\n') }
        rows_in_chunk += 1;

        if rows_in_chunk == chunk_rows {
            read_chunk(std::mem::replace(&mut chunk, header.to_vec()), district, &mut records, &mut stats)?;
            rows_in_chunk = 0;
        }
    }
    if rows_in_chunk > 0 {
        read_chunk(chunk, district, &mut records, &mut stats)?;
    }

    log::debug!(
        "[io::csv::read] {} rows in {} chunk(s): kept {}, no party {}, no votes {}, other district {}",
        stats.rows, stats.chunks, stats.kept, stats.without_party, stats.without_votes, stats.other_district,
    );
    Ok((records, stats))
}

/// Split off the header line (including its terminator).
fn split_header(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == b'\n') {
        Some(end) => bytes.split_at(end + 1),
        None => (bytes, &bytes[bytes.len()..]),
    }
}

/// Verify every required column is named in the header line.
fn check_header(header: &[u8]) -> Result<()> {
    let line = std::str::from_utf8(header)
        .map_err(|e| Error::format(SOURCE, format!("header is not valid UTF-8: {e}")))?;
    let names = line.trim_start_matches('\u{feff}')
        .trim_end()
        .split(',')
        .map(|name| name.trim().trim_matches('"'))
        .collect::<Vec<_>>();

    match REQUIRED_COLUMNS.iter().find(|required| !names.contains(*required)) {
        Some(missing) => Err(Error::format(SOURCE, format!("missing column '{missing}'"))),
        None => Ok(()),
    }
}

fn read_chunk(chunk: Vec<u8>, district: Option<&str>, records: &mut Vec<VoteRecord>, stats: &mut LoadStats) -> Result<()> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(chunk))
        .finish()
        .map_err(|e| Error::format(SOURCE, format!("failed to parse chunk {}: {e}", stats.chunks)))?;

    let districts = string_column(&df, DISTRICT_COLUMN)?;
    let circuits = string_column(&df, CIRCUIT_COLUMN)?;
    let offices = string_column(&df, OFFICE_COLUMN)?;
    let parties = string_column(&df, PARTY_COLUMN)?;
    let votes = string_column(&df, VOTES_COLUMN)?;

    let rows = districts.into_iter()
        .zip(circuits.into_iter())
        .zip(offices.into_iter())
        .zip(parties.into_iter())
        .zip(votes.into_iter());

    for ((((row_district, circuit), office), party), count) in rows {
        stats.rows += 1;
        let row_district = row_district.unwrap_or_default();

        if district.is_some_and(|wanted| wanted != row_district) {
            stats.other_district += 1;
            continue;
        }
        let Some(party) = party.filter(|p| !p.trim().is_empty()) else {
            stats.without_party += 1;
            continue;
        };
        let Some(count) = count.map(str::trim).filter(|c| !c.is_empty()) else {
            stats.without_votes += 1;
            continue;
        };
        let vote_count = parse_vote_count(count)
            .ok_or_else(|| Error::format(SOURCE, format!("invalid {VOTES_COLUMN} '{count}' at data row {}", stats.rows)))?;

        records.push(VoteRecord {
            district: row_district.to_string(),
            circuit_id: CircuitKey::new(circuit.unwrap_or_default()),
            office: office.unwrap_or_default().to_string(),
            party: party.to_string(),
            vote_count,
        });
        stats.kept += 1;
    }

    stats.chunks += 1;
    Ok(())
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .and_then(|column| column.str())
        .map_err(|e| Error::format(SOURCE, format!("column '{name}': {e}")))
}

/// Vote counts are non-negative integers; exports sometimes write them as `12.0`.
fn parse_vote_count(raw: &str) -> Option<u64> {
    if let Ok(count) = raw.parse::<u64>() { return Some(count) }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "año,distrito_nombre,circuito_id,cargo_nombre,agrupacion_nombre,votos_tipo,votos_cantidad\n";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = HEADER.to_string();
        for row in rows { out.push_str(row); out.push('\n'); }
        out.into_bytes()
    }

    fn sample() -> Vec<u8> {
        csv(&[
            "2023,Buenos Aires,00001,PRESIDENTE,LA LIBERTAD AVANZA,POSITIVO,30",
            "2023,Buenos Aires,00001,PRESIDENTE,UNION POR LA PATRIA,POSITIVO,70",
            "2023,Buenos Aires,00001,PRESIDENTE,,EN BLANCO,4",
            "2023,Córdoba,00450,PRESIDENTE,\"JUNTOS, POR EL CAMBIO\",POSITIVO,12",
            "2023,Córdoba,00450,GOBERNADOR,HACEMOS,POSITIVO,",
            "2023,Buenos Aires,00002,PRESIDENTE,LA LIBERTAD AVANZA,POSITIVO,5.0",
        ])
    }

    #[test]
    fn reads_rows_and_normalizes_circuits() {
        let (records, stats) = read_votes(&sample(), &LoadOptions::default()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].circuit_id.as_str(), "1");
        assert_eq!(records[0].party, "LA LIBERTAD AVANZA");
        assert_eq!(records[2].party, "JUNTOS, POR EL CAMBIO");
        assert_eq!(records[2].circuit_id.as_str(), "450");
        assert_eq!(records[3].vote_count, 5);
        assert_eq!(stats.rows, 6);
        assert_eq!(stats.without_party, 1);
        assert_eq!(stats.without_votes, 1);
        assert_eq!(stats.chunks, 1);
    }

    #[test]
    fn chunked_read_matches_whole_read() {
        let whole = read_votes(&sample(), &LoadOptions::default()).unwrap().0;
        for chunk_rows in 1..=7 {
            let options = LoadOptions { chunk_rows: Some(chunk_rows), district: None };
            let (chunked, stats) = read_votes(&sample(), &options).unwrap();
            assert_eq!(chunked, whole, "chunk size {chunk_rows}");
            assert_eq!(stats.chunks, 6usize.div_ceil(chunk_rows));
        }
    }

    #[test]
    fn district_filter_applies_per_chunk() {
        let options = LoadOptions { chunk_rows: Some(2), district: Some("Córdoba".into()) };
        let (records, stats) = read_votes(&sample(), &options).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| r.district == "Córdoba"));
        assert_eq!(stats.other_district, 4);
    }

    #[test]
    fn missing_column_is_fatal() {
        let bytes = b"distrito_nombre,circuito_id,cargo_nombre,agrupacion_nombre\nX,1,P,A\n";
        let err = read_votes(bytes, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Format { ref detail, .. } if detail.contains("votos_cantidad")));
    }

    #[test]
    fn negative_votes_are_rejected() {
        let bytes = csv(&["2023,X,1,P,A,POSITIVO,-3"]);
        assert!(matches!(read_votes(&bytes, &LoadOptions::default()), Err(Error::Format { .. })));
    }

    #[test]
    fn header_only_yields_nothing() {
        let (records, stats) = read_votes(HEADER.as_bytes(), &LoadOptions::default()).unwrap();
        assert!(records.is_empty());
        assert_eq!(stats.chunks, 0);
    }

    #[test]
    fn crlf_and_missing_final_newline() {
        let bytes = format!("{}2023,X,01,P,A,POSITIVO,3\r\n2023,X,02,P,A,POSITIVO,4", HEADER.replace('\n', "\r\n"));
        let (records, _) = read_votes(bytes.as_bytes(), &LoadOptions { chunk_rows: Some(1), district: None }).unwrap();
        assert_eq!(records.iter().map(|r| r.vote_count).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(records[1].circuit_id.as_str(), "2");
    }
}

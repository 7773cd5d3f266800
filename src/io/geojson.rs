//! GeoJSON reading for the circuit boundary layer.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

use crate::{error::{Error, Result}, types::{CircuitGeometry, CircuitKey}};

const SOURCE: &str = "circuits GeoJSON";

const CIRCUIT_PROPERTY: &str = "circuito";
const HEAD_LOCALITY_PROPERTY: &str = "cabecera";
const SUBDIVISION_PROPERTY: &str = "departamen";

/// Read circuit features from a GeoJSON FeatureCollection.
/// Returns the circuits and the number of features skipped for lacking a
/// polygonal geometry.
pub(crate) fn read_circuits(bytes: &[u8]) -> Result<(Vec<CircuitGeometry>, usize)> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::format(SOURCE, format!("[io::geojson] invalid JSON: {e}")))?;

    let features = value.get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::format(SOURCE, "[io::geojson] expected a FeatureCollection with a 'features' array"))?;

    let mut circuits = Vec::with_capacity(features.len());
    let mut skipped = 0;

    for (idx, feature) in features.iter().enumerate() {
        let empty = Map::new();
        let properties = feature.get("properties").and_then(Value::as_object).unwrap_or(&empty);

        let raw_id = property_string(properties, CIRCUIT_PROPERTY)
            .ok_or_else(|| Error::format(SOURCE, format!("[io::geojson] feature {idx} has no '{CIRCUIT_PROPERTY}'")))?;

        let head_locality = property_string(properties, HEAD_LOCALITY_PROPERTY);
        let subdivision = property_string(properties, SUBDIVISION_PROPERTY);
        let (head_locality, district_subdivision) = match (head_locality, subdivision) {
            (Some(head), Some(sub)) => (head, sub),
            (Some(head), None) => (head.clone(), head),
            (None, Some(sub)) => (sub.clone(), sub),
            (None, None) => return Err(Error::format(SOURCE, format!(
                "[io::geojson] feature {idx} has neither '{HEAD_LOCALITY_PROPERTY}' nor '{SUBDIVISION_PROPERTY}'"
            ))),
        };

        let Some(polygon) = parse_geometry(feature.get("geometry").unwrap_or(&Value::Null), idx)? else {
            skipped += 1;
            continue;
        };

        circuits.push(CircuitGeometry {
            circuit_id: CircuitKey::new(&raw_id),
            raw_id,
            head_locality,
            district_subdivision,
            polygon,
        });
    }

    if skipped > 0 {
        log::warn!("[io::geojson] skipped {skipped} feature(s) without polygon geometry");
    }
    Ok((circuits, skipped))
}

/// Read a property as text. Numeric ids are rendered without a fractional part.
fn property_string(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => Some(u.to_string()),
            (_, Some(i), _) => Some(i.to_string()),
            (_, _, Some(f)) if f.fract() == 0.0 => Some(format!("{f:.0}")),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// Parse a Polygon or MultiPolygon geometry; `None` for null or other types.
fn parse_geometry(geometry: &Value, idx: usize) -> Result<Option<MultiPolygon<f64>>> {
    let coords = geometry.get("coordinates").and_then(Value::as_array);
    match (geometry.get("type").and_then(Value::as_str), coords) {
        (Some("Polygon"), Some(rings)) => Ok(Some(MultiPolygon(vec![parse_polygon(rings, idx)?]))),
        (Some("MultiPolygon"), Some(polygons)) => {
            let polygons = polygons.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| invalid(idx, "polygon must be an array of rings"))?;
                    parse_polygon(rings, idx)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse `[exterior, hole, hole, ...]`.
fn parse_polygon(rings: &[Value], idx: usize) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| invalid(idx, "ring must be an array of positions"))
            .and_then(|ring| parse_ring_coords(ring, idx))
    });
    let exterior = rings.next()
        .ok_or_else(|| invalid(idx, "polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse `[[x, y], [x, y], ...]`, closing the ring if needed.
fn parse_ring_coords(coords: &[Value], idx: usize) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| {
            let position = position.as_array().filter(|p| p.len() >= 2)
                .ok_or_else(|| invalid(idx, "position must have at least two numbers"))?;
            match (position[0].as_f64(), position[1].as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(invalid(idx, "coordinates must be numbers")),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    Ok(LineString(points))
}

fn invalid(idx: usize, detail: &str) -> Error {
    Error::format(SOURCE, format!("[io::geojson] feature {idx}: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use serde_json::json;

    fn square(x: f64, y: f64) -> Value {
        json!([[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]])
    }

    #[test]
    fn reads_polygons_and_multipolygons() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature",
                  "properties": { "circuito": "0012", "cabecera": "La Plata", "departamen": "La Plata" },
                  "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } },
                { "type": "Feature",
                  "properties": { "circuito": 345, "departamen": "Berisso" },
                  "geometry": { "type": "MultiPolygon", "coordinates": [square(2.0, 0.0), square(4.0, 0.0)] } },
                { "type": "Feature",
                  "properties": { "circuito": "9", "cabecera": "Ensenada" },
                  "geometry": null },
            ]
        });
        let (circuits, skipped) = read_circuits(doc.to_string().as_bytes()).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(circuits.len(), 2);
        assert_eq!(circuits[0].circuit_id.as_str(), "12");
        assert_eq!(circuits[0].raw_id, "0012");
        assert_eq!(circuits[0].head_locality, "La Plata");
        assert_eq!(circuits[1].circuit_id.as_str(), "345");
        assert_eq!(circuits[1].head_locality, "Berisso");
        assert_eq!(circuits[1].polygon.0.len(), 2);
        assert!((circuits[1].polygon.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_circuit_property_is_fatal() {
        let doc = json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "cabecera": "X" },
              "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } }
        ]});
        let err = read_circuits(doc.to_string().as_bytes()).unwrap_err();
        assert!(err.to_string().contains("circuito"));
    }

    #[test]
    fn unclosed_rings_are_closed() {
        let ring = [json!([0.0, 0.0]), json!([1.0, 0.0]), json!([1.0, 1.0])];
        let line = parse_ring_coords(&ring, 0).unwrap();
        assert_eq!(line.0.len(), 4);
        assert_eq!(line.0.first(), line.0.last());
    }

    #[test]
    fn not_a_feature_collection() {
        assert!(matches!(read_circuits(b"[1, 2]"), Err(Error::Format { .. })));
    }
}

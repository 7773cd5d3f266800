use std::io::Write;

use geo::{Coord, CoordsIter, LineString, MultiPolygon};

use super::{escape, Rgb};
use crate::error::Result;

/// Projection function: lon/lat -> SVG coords (x,y)
pub(crate) type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Draw one path per multipolygon, filled with the matching color.
/// `title` becomes a hover tooltip.
pub(crate) fn draw_polygons_with_fill(
    writer: &mut impl Write,
    polygons: &[(&MultiPolygon<f64>, Rgb, String)],
    project: &Projection,
) -> Result<()> {
    for (polygon, color, title) in polygons {
        writeln!(writer,
            r#"<path class="circ" fill-rule="evenodd" d="{}" style="fill:{}"><title>{}</title></path>"#,
            multipolygon_to_path(polygon, project), color, escape(title),
        )?;
    }
    Ok(())
}

/// Draw a color legend in the top-left corner below the title.
pub(crate) fn draw_legend(writer: &mut impl Write, entries: &[(String, Rgb)], x: f64, y: f64) -> Result<()> {
    for (i, (label, color)) in entries.iter().enumerate() {
        let row = y + 22.0 * i as f64;
        writeln!(writer, r##"<rect x="{x:.1}" y="{row:.1}" width="14" height="14" style="fill:{color}" stroke="#000000" stroke-width="0.5"/>"##)?;
        writeln!(writer, r#"<text class="legend" x="{:.1}" y="{:.1}">{}</text>"#, x + 20.0, row + 12.0, escape(label))?;
    }
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn path_has_one_subpath_per_ring() {
        let shape = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0)]]);
        let identity = |c: &Coord<f64>| (c.x, c.y);
        let path = multipolygon_to_path(&shape, &identity);
        assert_eq!(path.matches('M').count(), 1);
        assert!(path.starts_with(" M0.000,0.000 L2.000,0.000"));
        assert!(path.ends_with('Z'));
    }
}

//! SVG writing operations.

use std::io::Write;

use crate::error::{Error, Result};

/// String-backed SVG writer.
pub(crate) struct SvgStringWriter {
    buffer: Vec<u8>
}

impl Write for SvgStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl SvgStringWriter {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Get the SVG string
    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer)
            .map_err(|e| Error::format("map", format!("[io::svg] SVG output is not valid UTF-8: {e}")))
    }

    /// Write the XML declaration, the opening <svg> tag and a white background.
    pub(crate) fn write_header(&mut self, width: f64, height: f64, bounds: &geo::Rect) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width:.0}" height="{height:.0}"
        viewBox="0 0 {width:.0} {height:.0}"
        data-lon-min="{lon_min}" data-lon-max="{lon_max}"
        data-lat-min="{lat_min}" data-lat-max="{lat_max}">"##,
            lon_min = bounds.min().x,
            lon_max = bounds.max().x,
            lat_min = bounds.min().y,
            lat_max = bounds.max().y,
        )?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    /// Write SVG styles for map features.
    pub(crate) fn write_styles(&mut self) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .circ {{ stroke: #000000; stroke-width: 0.4; vector-effect: non-scaling-stroke; }}
    .title {{ font: bold 20px sans-serif; fill: #111827; }}
    .legend {{ font: 13px sans-serif; fill: #111827; }}
</style>
</defs>"##)?;
        Ok(())
    }

    /// Write the map title, centered at the top.
    pub(crate) fn write_title(&mut self, width: f64, title: &str) -> Result<()> {
        writeln!(self, r#"<text class="title" x="{:.1}" y="28" text-anchor="middle">{}</text>"#, width / 2.0, escape(title))?;
        Ok(())
    }

    /// Write the closing </svg> tag.
    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }
}

/// Escape text for use in XML content and attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

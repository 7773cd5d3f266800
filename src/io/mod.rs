//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `zip` - extraction of one member from an in-memory archive
//! - `csv` - the results CSV (read) and report tables (write)
//! - `geojson` - the circuit boundary layer
//! - `svg` - choropleth rendering and party colors
//! - `html` - the single-page report
//! - `fs` - atomic output files

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod html;
pub(crate) mod svg;
pub(crate) mod zip;
mod fs;

pub use csv::{LoadOptions, LoadStats};
pub use fs::*;
pub use svg::{party_color, party_color_name, Rgb, BLUE, GREY, PARTY_COLORS, VIOLET, YELLOW};

//! SVG format writing operations for the circuit map.

mod color;
mod proj;
mod writer;

pub use color::*;
pub(crate) use proj::*;
pub(crate) use writer::*;

//! Vote aggregation per circuit and the join against circuit boundaries.

mod aggregation;
mod joined;

pub use aggregation::*;
pub use joined::*;

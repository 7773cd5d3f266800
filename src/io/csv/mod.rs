//! CSV format reading and writing operations.

mod read;
mod write;

pub use read::{LoadOptions, LoadStats};
pub(crate) use read::read_votes;
pub(crate) use write::*;

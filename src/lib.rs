#![doc = "Circuit-level results of the 2023 Argentine general election: fetch, join, tally and map."]
mod dashboard;
mod error;
mod io;
mod source;
mod tally;
mod types;

#[doc(inline)]
pub use dashboard::{load_datasets, Choice, Dashboard, Options, PartyTotal, Report, Selection};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use io::{
    party_color, party_color_name, write_atomic, write_atomic_all, LoadOptions, LoadStats, PendingWrite, Rgb,
    BLUE, GREY, PARTY_COLORS, VIOLET, YELLOW,
};

#[doc(inline)]
pub use source::*;

#[doc(inline)]
pub use tally::*;

#[doc(inline)]
pub use types::*;

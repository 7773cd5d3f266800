mod circuit_key;
mod records;

pub use circuit_key::*;
pub use records::*;

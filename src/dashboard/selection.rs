use std::{convert::Infallible, fmt, str::FromStr};

use ahash::AHashSet;

use crate::types::{normalize_circuit_id, Datasets};

/// One filter control: everything, or a single value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }

    pub fn is_all(&self) -> bool { matches!(self, Choice::All) }
}

impl FromStr for Choice {
    type Err = Infallible;

    /// `all`, `todas`, `todos` (any case) and the empty string select everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_lowercase().as_str() {
            "" | "all" | "todas" | "todos" => Choice::All,
            _ => Choice::Only(s.to_string()),
        })
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => f.write_str(value),
        }
    }
}

/// The filter values driving one render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Vote rows' `distrito_nombre`.
    pub district: Choice,
    /// Boundary features' `cabecera`.
    pub head_locality: Choice,
    /// `cargo_nombre`; `None` picks the first office in the data.
    pub office: Option<String>,
    /// Circuit id, compared after normalization.
    pub circuit: Choice,
}

/// Values available for each control, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub districts: Vec<String>,
    pub offices: Vec<String>,
    pub head_localities: Vec<String>,
    pub circuits: Vec<String>,
}

impl Options {
    pub fn from_datasets(data: &Datasets) -> Self {
        Self {
            districts: unique(data.votes.iter().map(|v| v.district.as_str())),
            offices: unique(data.votes.iter().map(|v| v.office.as_str())),
            head_localities: unique(data.circuits.iter().map(|c| c.head_locality.as_str())),
            circuits: unique(data.circuits.iter().map(|c| c.raw_id.as_str())),
        }
    }

    pub(crate) fn has_circuit(&self, raw: &str) -> bool {
        let wanted = normalize_circuit_id(raw);
        self.circuits.iter().any(|c| normalize_circuit_id(c) == wanted)
    }
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = AHashSet::new();
    values.filter(|v| seen.insert(*v)).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_select_everything() {
        for s in ["all", "Todas", "TODOS", "", "  todas "] {
            assert_eq!(s.parse::<Choice>().unwrap(), Choice::All);
        }
        assert_eq!(" La Plata ".parse::<Choice>().unwrap(), Choice::Only("La Plata".into()));
        assert_eq!(Choice::Only("12".into()).as_option(), Some("12"));
    }

    #[test]
    fn unique_keeps_first_seen_order() {
        let values = ["b", "a", "b", "c", "a"];
        assert_eq!(unique(values.into_iter()), vec!["b", "a", "c"]);
    }
}

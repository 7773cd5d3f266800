//! Party colors for the circuit map.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// CSS `violet`.
pub const VIOLET: Rgb = Rgb { r: 238, g: 130, b: 238 };
/// CSS `yellow`.
pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };
/// CSS `blue`.
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
/// CSS `grey`, used for every party without an assigned color.
pub const GREY: Rgb = Rgb { r: 128, g: 128, b: 128 };

/// Parties with a fixed map color, with the CSS name used in legends.
pub const PARTY_COLORS: &[(&str, &str, Rgb)] = &[
    ("LA LIBERTAD AVANZA", "violet", VIOLET),
    ("JUNTOS POR EL CAMBIO", "yellow", YELLOW),
    ("UNION POR LA PATRIA", "blue", BLUE),
];

/// Fill color for a circuit won by `party`. Unknown parties and circuits
/// without a winner are grey.
pub fn party_color(party: Option<&str>) -> Rgb {
    party.and_then(|party| PARTY_COLORS.iter().find(|(name, _, _)| *name == party))
        .map_or(GREY, |&(_, _, color)| color)
}

/// CSS color name matching [`party_color`].
pub fn party_color_name(party: Option<&str>) -> &'static str {
    party.and_then(|party| PARTY_COLORS.iter().find(|(name, _, _)| *name == party))
        .map_or("grey", |&(_, css, _)| css)
}

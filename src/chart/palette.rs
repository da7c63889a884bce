//! Round colors.
//!
//! Colors are chosen by round label, never by position in the table, so
//! a round keeps its color across seasons and partial-season charts.

use std::fmt;

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build a color from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Wildcard, Division, Conference, Champions, then every other round.
pub const ROUND_COLORS: [Rgb; 5] = [
    Rgb::from_hex(0x95c4e8),
    Rgb::from_hex(0xa3e6be),
    Rgb::from_hex(0xfbee9d),
    Rgb::from_hex(0xfbbf9d),
    Rgb::from_hex(0xe29dfb),
];

/// Palette slot for a round label.
pub fn round_slot(round: &str) -> usize {
    let normalized: String = round
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();

    match normalized.as_str() {
        "wildcard" => 0,
        "division" | "divisional" => 1,
        "conference" => 2,
        "champions" | "championship" | "superbowl" | "final" => 3,
        _ => 4,
    }
}

/// Fill color for a round's bar segments.
pub fn round_color(round: &str) -> Rgb {
    ROUND_COLORS[round_slot(round)]
}

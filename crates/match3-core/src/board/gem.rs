//! Gem identity, kind, and power-up tagging.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Opaque, monotonically-assigned identity for a gem. Stable for the gem's
/// lifetime; retired permanently once the gem is destroyed. Every occupied
/// cell carries a distinct id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemId(pub u64);

/// Base gem category. The default configuration uses all seven; Difficulty
/// narrows `kinds_allowed` to a prefix subset of size 4..=7.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Kind {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
}

impl Kind {
    pub const MAX_KINDS: u8 = 7;

    /// The `n` lowest-ordinal kinds, for `Difficulty`'s `kinds_allowed`
    /// subsetting. `n` is clamped to `1..=MAX_KINDS`.
    pub fn prefix(n: u8) -> Vec<Kind> {
        let n = n.clamp(1, Self::MAX_KINDS);
        (0..n).map(|i| Kind::from_ordinal(i).unwrap()).collect()
    }

    pub fn from_ordinal(i: u8) -> Option<Kind> {
        use Kind::*;
        match i {
            0 => Some(A),
            1 => Some(B),
            2 => Some(C),
            3 => Some(D),
            4 => Some(E),
            5 => Some(F),
            6 => Some(G),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Power-up modifier a gem can carry. A tagged gem is inert for ordinary
/// match detection until it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PowerUpTag {
    /// Clears the gem's entire row on activation.
    LineH,
    /// Clears the gem's entire column on activation.
    LineV,
    /// Clears the 3x3 neighborhood (clipped to the board) on activation.
    Bomb3x3,
    /// Clears every cell of a target `Kind` on activation.
    ColorClear,
}

/// A single gem occupying a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gem {
    pub id: GemId,
    pub kind: Kind,
    pub power_up: Option<PowerUpTag>,
}

impl Gem {
    pub fn new(id: GemId, kind: Kind) -> Self {
        Self {
            id,
            kind,
            power_up: None,
        }
    }

    pub fn with_power_up(id: GemId, kind: Kind, tag: PowerUpTag) -> Self {
        Self {
            id,
            kind,
            power_up: Some(tag),
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.power_up.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn all_seven_kinds_round_trip_through_ordinal() {
        let all: Vec<Kind> = Kind::iter().collect();
        assert_eq!(all.len(), Kind::MAX_KINDS as usize);
        for k in all {
            assert_eq!(Kind::from_ordinal(k.ordinal()), Some(k));
        }
    }

    #[test]
    fn prefix_is_a_stable_low_ordinal_subset() {
        let four = Kind::prefix(4);
        assert_eq!(four, vec![Kind::A, Kind::B, Kind::C, Kind::D]);
        assert_eq!(Kind::prefix(0), Kind::prefix(1));
        assert_eq!(Kind::prefix(99), Kind::prefix(Kind::MAX_KINDS));
    }

    #[test]
    fn display_names_match_variant_names() {
        assert_eq!(Kind::A.to_string(), "A");
        assert_eq!(PowerUpTag::Bomb3x3.to_string(), "Bomb3x3");
    }
}

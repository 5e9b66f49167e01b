//! Colors, creature types and tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HiveError;

// ============================================================================
// COLOR
// ============================================================================

/// Side color. White always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Prefix used in token notation (`w` / `b`)
    pub fn prefix(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'w' | 'W' => Some(Color::White),
            'b' | 'B' => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

// ============================================================================
// BUG TYPES
// ============================================================================

/// Creature kinds. `Unknown` stands in for anything the engine does not
/// recognise and never moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BugType {
    QueenBee,
    Beetle,
    Grasshopper,
    Spider,
    SoldierAnt,
    Mosquito,
    LadyBug,
    PillBug,
    Unknown,
}

/// Base game supply per player: (bug, count)
pub const BASE_SUPPLY: [(BugType, u8); 5] = [
    (BugType::QueenBee, 1),
    (BugType::Spider, 2),
    (BugType::Grasshopper, 3),
    (BugType::SoldierAnt, 3),
    (BugType::Beetle, 2),
];

/// Expansion creatures, one of each
pub const EXPANSION_SUPPLY: [(BugType, u8); 3] = [
    (BugType::Mosquito, 1),
    (BugType::LadyBug, 1),
    (BugType::PillBug, 1),
];

impl BugType {
    /// One-letter key used in token ids
    pub fn key(self) -> char {
        match self {
            BugType::QueenBee => 'Q',
            BugType::Beetle => 'B',
            BugType::Grasshopper => 'G',
            BugType::Spider => 'S',
            BugType::SoldierAnt => 'A',
            BugType::Mosquito => 'M',
            BugType::LadyBug => 'L',
            BugType::PillBug => 'P',
            BugType::Unknown => '?',
        }
    }

    /// Unrecognised keys map to `Unknown`
    pub fn from_key(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'Q' => BugType::QueenBee,
            'B' => BugType::Beetle,
            'G' => BugType::Grasshopper,
            'S' => BugType::Spider,
            'A' => BugType::SoldierAnt,
            'M' => BugType::Mosquito,
            'L' => BugType::LadyBug,
            'P' => BugType::PillBug,
            _ => BugType::Unknown,
        }
    }

    /// Creatures that exist once per player carry no number in their id
    pub fn is_unique(self) -> bool {
        matches!(
            self,
            BugType::QueenBee | BugType::Mosquito | BugType::LadyBug | BugType::PillBug
        )
    }

    /// Can copy the movement of a touching creature
    pub fn can_mimic(self) -> bool {
        self == BugType::Mosquito
    }

    /// Can relocate adjacent tokens
    pub fn can_move_others(self) -> bool {
        self == BugType::PillBug
    }

    pub fn name(self) -> &'static str {
        match self {
            BugType::QueenBee => "Queen Bee",
            BugType::Beetle => "Beetle",
            BugType::Grasshopper => "Grasshopper",
            BugType::Spider => "Spider",
            BugType::SoldierAnt => "Soldier Ant",
            BugType::Mosquito => "Mosquito",
            BugType::LadyBug => "Lady Bug",
            BugType::PillBug => "Pill Bug",
            BugType::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// TOKEN
// ============================================================================

/// A single game piece. Identity is (color, bug, number); where it sits is
/// tracked by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Token {
    pub color: Color,
    pub bug: BugType,
    pub number: u8,
}

impl Token {
    pub const fn new(color: Color, bug: BugType, number: u8) -> Self {
        Self { color, bug, number }
    }

    pub const fn queen(color: Color) -> Self {
        Self::new(color, BugType::QueenBee, 1)
    }

    /// Id without color, e.g. `Q`, `A2`
    pub fn id(&self) -> String {
        if self.bug.is_unique() {
            self.bug.key().to_string()
        } else {
            format!("{}{}", self.bug.key(), self.number)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.prefix(), self.id())
    }
}

impl FromStr for Token {
    type Err = HiveError;

    /// Parses `wQ`, `bA2`, `wG3`. Unique creatures may omit the number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let color = chars
            .next()
            .and_then(Color::from_prefix)
            .ok_or_else(|| HiveError::UnknownToken(s.to_string()))?;
        let bug = chars
            .next()
            .map(BugType::from_key)
            .ok_or_else(|| HiveError::UnknownToken(s.to_string()))?;
        let rest: String = chars.collect();
        let number = if rest.is_empty() {
            1
        } else {
            rest.parse::<u8>()
                .map_err(|_| HiveError::UnknownToken(s.to_string()))?
        };
        Ok(Token::new(color, bug, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ids() {
        assert_eq!(Token::queen(Color::White).to_string(), "wQ");
        assert_eq!(Token::new(Color::Black, BugType::SoldierAnt, 2).to_string(), "bA2");
        assert_eq!(Token::new(Color::White, BugType::Mosquito, 1).id(), "M");
    }

    #[test]
    fn test_parse_token() {
        let t: Token = "bG3".parse().unwrap();
        assert_eq!(t, Token::new(Color::Black, BugType::Grasshopper, 3));
        let q: Token = "wQ".parse().unwrap();
        assert_eq!(q, Token::queen(Color::White));
        assert!("xQ".parse::<Token>().is_err());
    }

    #[test]
    fn test_unknown_bug_key() {
        let t: Token = "wX1".parse().unwrap();
        assert_eq!(t.bug, BugType::Unknown);
        assert!(!t.bug.can_mimic());
        assert!(!t.bug.can_move_others());
    }

    #[test]
    fn test_supply_sizes() {
        let base: u8 = BASE_SUPPLY.iter().map(|(_, n)| n).sum();
        assert_eq!(base, 11);
        assert_eq!(EXPANSION_SUPPLY.len(), 3);
    }
}

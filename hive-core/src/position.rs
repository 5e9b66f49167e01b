//! Standard Position canonicalisation and Zobrist keys
//!
//! The board hashes every token at its *canonical* coordinate: translated so
//! an anchor token sits at the origin, rotated and optionally mirrored. Two
//! hives that differ only by where they were built on the unbounded grid
//! therefore share a key, which is what the transposition table needs.

use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::error::HiveError;
use crate::pieces::{Color, Token};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Seed for key generation
const SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Key XORed into a game key when Black is to move
pub const SIDE_TO_MOVE: u64 = 0x9E6C_63D0_676A_9A99;

// ============================================================================
// MODE AND TRANSFORM
// ============================================================================

/// How much canonicalisation the board performs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardPositionMode {
    /// Opening anchors, then both queens once they are placed
    #[default]
    Enabled,
    /// Opening anchors only
    Limited,
    /// Raw coordinates are hashed
    Disabled,
}

/// Translation, clockwise rotation steps and mirror flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardPosition {
    pub origin: Hex,
    pub rotation: u8,
    pub flip: bool,
}

impl StandardPosition {
    /// Map a board coordinate to its canonical coordinate
    pub fn apply(&self, hex: Hex) -> Hex {
        let mut h = Hex::new(hex.q - self.origin.q, hex.r - self.origin.r);
        for _ in 0..self.rotation {
            h = rotate_clockwise(h);
        }
        if self.flip {
            h = flip(h);
        }
        h
    }
}

/// 60 degree clockwise rotation around the origin.
/// Cube `[x, y, z] -> [-z, -x, -y]`.
pub fn rotate_clockwise(hex: Hex) -> Hex {
    Hex::new(-hex.r, hex.q + hex.r)
}

/// Mirror across the q axis. Cube `[x, y, z] -> [-y, -x, -z]`.
pub fn flip(hex: Hex) -> Hex {
    Hex::new(hex.q + hex.r, -hex.r)
}

/// Number of clockwise steps that bring `offset` into the sector
/// `q > 0, r >= 0`. A neighbor of the origin ends up exactly on (1,0).
fn rotation_into_sector(offset: Hex) -> Result<u8, HiveError> {
    if offset == Hex::ORIGIN {
        return Ok(0);
    }
    let mut h = offset;
    for steps in 0..6u8 {
        if h.q > 0 && h.r >= 0 {
            return Ok(steps);
        }
        h = rotate_clockwise(h);
    }
    Err(HiveError::invariant(format!(
        "standard position rotation for offset {} did not converge",
        offset
    )))
}

fn offset(from: Hex, to: Hex) -> Hex {
    Hex::new(to.q - from.q, to.r - from.r)
}

/// Canonical frame anchored on both queens
pub(crate) fn queen_frame(white_queen: Hex, black_queen: Hex) -> Result<StandardPosition, HiveError> {
    Ok(StandardPosition {
        origin: white_queen,
        rotation: rotation_into_sector(offset(white_queen, black_queen))?,
        flip: false,
    })
}

/// Canonical frame anchored on the first tokens placed (at most four are
/// consulted), given in placement order.
pub(crate) fn opening_frame(anchors: &[Hex]) -> Result<Option<StandardPosition>, HiveError> {
    let Some(&origin) = anchors.first() else {
        return Ok(None);
    };
    let rotation = match anchors.get(1) {
        Some(&second) => rotation_into_sector(offset(origin, second))?,
        None => 0,
    };
    let mut frame = StandardPosition { origin, rotation, flip: false };

    if let Some(&third) = anchors.get(2) {
        let r3 = frame.apply(third).r;
        frame.flip = if r3 == 0 {
            anchors.get(3).map_or(false, |&fourth| frame.apply(fourth).r > 0)
        } else {
            r3 > 0
        };
    }
    Ok(Some(frame))
}

// ============================================================================
// ZOBRIST KEYS
// ============================================================================

/// splitmix64 finaliser
const fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Key for one token at a canonical coordinate and stack height (1 = ground).
pub fn token_key(canonical: Hex, height: usize, token: Token) -> u64 {
    let q = canonical.q as i16 as u16 as u64;
    let r = canonical.r as i16 as u16 as u64;
    let color = match token.color {
        Color::White => 0u64,
        Color::Black => 1u64,
    };
    let packed = (q << 48)
        | (r << 32)
        | ((height as u64 & 0xFF) << 16)
        | (color << 8)
        | token.bug as u64;
    mix(SEED ^ packed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::BugType;

    #[test]
    fn test_rotation_cycle() {
        let mut h = Hex::new(0, -1);
        let expected = [
            Hex::new(1, -1),
            Hex::new(1, 0),
            Hex::new(0, 1),
            Hex::new(-1, 1),
            Hex::new(-1, 0),
            Hex::new(0, -1),
        ];
        for e in expected {
            h = rotate_clockwise(h);
            assert_eq!(h, e);
        }
    }

    #[test]
    fn test_every_offset_has_a_sector() {
        for q in -4..=4 {
            for r in -4..=4 {
                let h = Hex::new(q, r);
                if h != Hex::ORIGIN {
                    assert!(rotation_into_sector(h).is_ok(), "no sector for {}", h);
                }
            }
        }
    }

    #[test]
    fn test_opening_frame_second_token_on_axis() {
        let frame = opening_frame(&[Hex::new(1, 1), Hex::new(1, 2)]).unwrap().unwrap();
        assert_eq!(frame.apply(Hex::new(1, 1)), Hex::new(0, 0));
        assert_eq!(frame.apply(Hex::new(1, 2)), Hex::new(1, 0));
    }

    #[test]
    fn test_opening_frame_flip_on_third_token() {
        let frame = opening_frame(&[Hex::new(1, 1), Hex::new(1, 2), Hex::new(0, 1)])
            .unwrap()
            .unwrap();
        assert!(frame.flip);
        assert_eq!(frame.apply(Hex::new(0, 1)), Hex::new(0, -1));
        assert_eq!(frame.apply(Hex::new(1, 2)), Hex::new(1, 0));
    }

    #[test]
    fn test_token_keys_differ() {
        let t = Token::new(Color::White, BugType::SoldierAnt, 1);
        let a = token_key(Hex::new(0, 0), 1, t);
        let b = token_key(Hex::new(0, 0), 2, t);
        let c = token_key(Hex::new(0, 0), 1, Token::new(Color::Black, BugType::SoldierAnt, 1));
        assert_ne!(a, b);
        assert_ne!(a, c);
        // number is not part of the key
        assert_eq!(a, token_key(Hex::new(0, 0), 1, Token::new(Color::White, BugType::SoldierAnt, 3)));
    }
}

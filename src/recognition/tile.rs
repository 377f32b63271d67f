//! Semantic tile values.

use serde::{Deserialize, Serialize};

/// Classified state of one grid cell.
///
/// Each tile has a one-byte code (see [`Tile::code`]); numbers use their
/// literal mine count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tile {
    /// Revealed cell with no adjacent mines
    OpenSpace,
    /// Revealed cell with 1..=8 adjacent mines
    Number(u8),
    /// Cell marked as a suspected mine
    Flag,
    /// Visible (detonated) mine
    Bomb,
    /// Unrevealed cell
    Unknown,
}

pub const CODE_FLAG: u8 = 32;
pub const CODE_BOMB: u8 = 64;
pub const CODE_UNKNOWN: u8 = 255;

impl Tile {
    /// Creates a number tile; `None` unless `count` is in 1..=8.
    pub fn number(count: u8) -> Option<Tile> {
        (1..=8).contains(&count).then_some(Tile::Number(count))
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::OpenSpace => 0,
            Tile::Number(n) => n,
            Tile::Flag => CODE_FLAG,
            Tile::Bomb => CODE_BOMB,
            Tile::Unknown => CODE_UNKNOWN,
        }
    }

    /// The mine count of a number tile.
    pub fn mine_count(self) -> Option<u8> {
        match self {
            Tile::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Tile::Unknown
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if let Some(tile) = Tile::number(code) {
            return Ok(tile);
        }
        match code {
            0 => Ok(Tile::OpenSpace),
            CODE_FLAG => Ok(Tile::Flag),
            CODE_BOMB => Ok(Tile::Bomb),
            CODE_UNKNOWN => Ok(Tile::Unknown),
            _ => Err(format!("Invalid tile code: {}", code)),
        }
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> u8 {
        tile.code()
    }
}

//! Tile classification: hash lookup plus the flat-square brightness check.

use serde::{Deserialize, Serialize};

use super::hash::average_hash;
use super::table::{ClassificationTable, TableEntry};
use super::tile::Tile;
use crate::capture::{to_image, PixelAccess};
use crate::error::UnmappedTile;

/// How flat (hash 0) tiles are told apart.
///
/// Open space renders light grey, unrevealed tiles darker; one interior pixel
/// is enough once the hash has ruled out every other tile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankProbe {
    /// Sample offset from the tile's top-left corner
    pub offset_x: u32,
    pub offset_y: u32,
    /// Average of R, G, B at or above this → open space
    pub brightness_threshold: u8,
}

impl Default for BlankProbe {
    fn default() -> Self {
        Self {
            offset_x: 1,
            offset_y: 1,
            brightness_threshold: 180,
        }
    }
}

impl BlankProbe {
    /// Channel average of the probe pixel, clamped into the tile.
    pub fn sample<P: PixelAccess + ?Sized>(&self, tile: &P) -> u8 {
        let x = self.offset_x.min(tile.width().saturating_sub(1));
        let y = self.offset_y.min(tile.height().saturating_sub(1));
        let p = tile.pixel(x, y);
        ((p[0] as u16 + p[1] as u16 + p[2] as u16) / 3) as u8
    }
}

/// Classifies one tile-sized region.
///
/// Returns the unmapped hash together with a copy of the tile when the hash
/// is not in the table; the caller decides what that means for the game.
pub fn classify_tile<P: PixelAccess + ?Sized>(
    tile: &P,
    table: &ClassificationTable,
    probe: &BlankProbe,
) -> Result<Tile, UnmappedTile> {
    let hash = average_hash(tile);
    match table.lookup(hash) {
        Some(TableEntry::Exact(value)) => Ok(value),
        Some(TableEntry::FlatSquare) => {
            if tile.width() == 0 || tile.height() == 0 {
                return Ok(Tile::Unknown);
            }
            if probe.sample(tile) >= probe.brightness_threshold {
                Ok(Tile::OpenSpace)
            } else {
                Ok(Tile::Unknown)
            }
        }
        None => Err(UnmappedTile {
            hash,
            image: to_image(tile),
        }),
    }
}

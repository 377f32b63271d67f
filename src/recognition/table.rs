//! Hash → tile lookup table.
//!
//! The built-in entries were captured from the reference game skin at a
//! 32 px tile size. Extra entries can be supplied through `config.json`
//! (`extra_tile_hashes`) once an unmapped tile has been dumped and inspected.
//! The table is built once and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use super::hash::ImageHash;
use super::tile::Tile;

/// Global table instance, built on first use.
static TABLE: OnceLock<ClassificationTable> = OnceLock::new();

/// What a matching hash tells us about a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableEntry {
    /// The hash identifies the tile on its own
    Exact(Tile),
    /// Flat single-colour square: open space or unrevealed, decided by brightness
    FlatSquare,
}

/// Extra table entry loaded from config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtraTileHash {
    pub hash: ImageHash,
    pub tile: Tile,
}

const BUILTIN_TILES: [(u64, Tile); 10] = [
    (0xFFC3C3E7E7E3E3FF, Tile::Number(1)),
    (0xFFC3E3E7CFC3E3FF, Tile::Number(2)),
    (0xFFE3C3C7E7C3E3FF, Tile::Number(3)),
    (0xFFEFC3C3E3E7EFFF, Tile::Number(4)),
    (0xFFE3C3CFE3E3E3FF, Tile::Number(5)),
    (0xFFE7C3C3E3E3E7FF, Tile::Number(6)),
    (0xFFF3F7E7E7C3C3FF, Tile::Number(7)),
    (0xFFE7C3C3E3C3E7FF, Tile::Number(8)),
    (0xFFF7F7C3C381F3FF, Tile::Flag),
    (0xFFFFC3C3C3C3FFFF, Tile::Bomb),
];

/// Immutable mapping from image hash to table entry.
#[derive(Clone, Debug)]
pub struct ClassificationTable {
    entries: HashMap<ImageHash, TableEntry>,
}

impl ClassificationTable {
    /// An empty table with only the flat-square entry (hash 0).
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(ImageHash::ZERO, TableEntry::FlatSquare);
        Self { entries }
    }

    /// The reference-skin table.
    pub fn builtin() -> Self {
        Self::new().with_tiles(
            BUILTIN_TILES
                .iter()
                .map(|&(hash, tile)| (ImageHash(hash), tile)),
        )
    }

    /// Adds exact entries. Hash 0 stays reserved for the flat square.
    pub fn with_tiles(mut self, tiles: impl IntoIterator<Item = (ImageHash, Tile)>) -> Self {
        for (hash, tile) in tiles {
            if hash == ImageHash::ZERO {
                crate::log("Ignoring table entry for hash 0 (reserved for flat tiles)");
                continue;
            }
            self.entries.insert(hash, TableEntry::Exact(tile));
        }
        self
    }

    pub fn lookup(&self, hash: ImageHash) -> Option<TableEntry> {
        self.entries.get(&hash).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Initializes the global table from the built-in entries plus config extras.
/// Call once at startup, after `init_config`.
pub fn init_table() {
    let table = get_table();
    crate::log(&format!("Classification table ready: {} entries", table.len()));
}

/// Returns the global table, building it on first use.
pub fn get_table() -> &'static ClassificationTable {
    TABLE.get_or_init(|| {
        let extra = &crate::automation::get_config().extra_tile_hashes;
        ClassificationTable::builtin().with_tiles(extra.iter().map(|e| (e.hash, e.tile)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let table = ClassificationTable::builtin();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup(ImageHash::ZERO), Some(TableEntry::FlatSquare));
        assert_eq!(
            table.lookup(ImageHash(0xFFC3C3E7E7E3E3FF)),
            Some(TableEntry::Exact(Tile::Number(1)))
        );
        assert_eq!(
            table.lookup(ImageHash(0xFFFFC3C3C3C3FFFF)),
            Some(TableEntry::Exact(Tile::Bomb))
        );
        assert_eq!(table.lookup(ImageHash(0x1234)), None);
    }

    #[test]
    fn test_extra_tiles_cannot_replace_flat_square() {
        let table = ClassificationTable::new().with_tiles([
            (ImageHash::ZERO, Tile::Flag),
            (ImageHash(0xAB), Tile::Number(3)),
        ]);
        assert_eq!(table.lookup(ImageHash::ZERO), Some(TableEntry::FlatSquare));
        assert_eq!(
            table.lookup(ImageHash(0xAB)),
            Some(TableEntry::Exact(Tile::Number(3)))
        );
    }

    #[test]
    fn test_extra_entry_from_json() {
        let entry: ExtraTileHash =
            serde_json::from_str(r#"{"hash": "00000000DEADBEEF", "tile": 2}"#).unwrap();
        assert_eq!(entry.hash, ImageHash(0xDEADBEEF));
        assert_eq!(entry.tile, Tile::Number(2));
    }
}

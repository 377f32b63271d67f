//! Tile recognition: turns cropped tile images into semantic values.
//!
//! This module provides:
//! - The `Tile` alphabet
//! - Average hashing of image regions (`average_hash`)
//! - The immutable hash lookup table (`get_table`)
//! - Single-tile classification (`classify_tile`)

pub mod classify;
pub mod hash;
pub mod table;
pub mod tile;

pub use classify::{classify_tile, BlankProbe};
pub use hash::{average_hash, ImageHash};
pub use table::{get_table, init_table, ClassificationTable, ExtraTileHash, TableEntry};
pub use tile::Tile;

//! Error types for the play loop.
//!
//! Everything else uses `anyhow`; these are the failures the session
//! controller has to tell apart.

use image::RgbaImage;
use thiserror::Error;

use crate::recognition::ImageHash;

/// A tile whose hash is not in the classification table.
#[derive(Error, Debug)]
#[error("unmapped tile hash {hash}")]
pub struct UnmappedTile {
    pub hash: ImageHash,
    /// Copy of the offending tile, for diagnostics
    pub image: RgbaImage,
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("could not find a window titled \"{0}\". Is the game running?")]
    WindowNotFound(String),
    #[error("tile ({x}, {y}) could not be classified: {source}")]
    Classification {
        x: usize,
        y: usize,
        #[source]
        source: UnmappedTile,
    },
    #[error("no move available, but the game was not reported as won")]
    Stalled,
}

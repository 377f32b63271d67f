//! Diagnostic images written into the session folder.
//!
//! Unmapped tiles are saved so their hashes can be added to the config;
//! whole frames are saved on request for inspecting a run afterwards.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::capture::{to_image, RasterBuffer};
use crate::error::UnmappedTile;

/// Writes the tile as `unmapped_<x>_<y>_<HASH>.png` into `dir`.
pub fn save_unmapped_tile(dir: &Path, x: usize, y: usize, tile: &UnmappedTile) -> Result<PathBuf> {
    let path = dir.join(format!("unmapped_{}_{}_{}.png", x, y, tile.hash));
    tile.image
        .save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(path)
}

/// Writes a captured frame as `frame_<attempt>_<index>.png` into `dir`.
pub fn save_frame(dir: &Path, attempt: u32, index: u32, raster: &RasterBuffer) -> Result<PathBuf> {
    let path = dir.join(format!("frame_{}_{:04}.png", attempt, index));
    to_image(raster)
        .save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::ImageHash;
    use image::{ImageBuffer, Rgba};
    use tempfile::tempdir;

    #[test]
    fn test_saves_named_png() {
        let dir = tempdir().unwrap();
        let tile = UnmappedTile {
            hash: ImageHash(0x00FF_00FF_00FF_00FF),
            image: ImageBuffer::from_pixel(32, 32, Rgba([10, 20, 30, 255])),
        };

        let path = save_unmapped_tile(dir.path(), 4, 7, &tile).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "unmapped_4_7_00FF00FF00FF00FF.png"
        );
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, tile.image);
    }

    #[test]
    fn test_saves_numbered_frame() {
        let dir = tempdir().unwrap();
        let img = ImageBuffer::from_fn(40, 30, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let raster = RasterBuffer::from_image(&img);

        let path = save_frame(dir.path(), 2, 13, &raster).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "frame_2_0013.png"
        );
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, img);
    }
}

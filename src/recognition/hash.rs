//! 64-bit average hash for tile images.
//!
//! The image is split into an 8x8 grid of blocks; each block contributes one
//! bit, set when the block's mean luma is strictly above the mean of all 64
//! blocks. Bit 63 is the top-left block, bit 0 the bottom-right one. A flat
//! image hashes to 0.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::capture::PixelAccess;

const GRID: u32 = 8;

/// Perceptual fingerprint of an image, compared by exact equality only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageHash(pub u64);

impl ImageHash {
    pub const ZERO: ImageHash = ImageHash(0);
}

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl FromStr for ImageHash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        u64::from_str_radix(digits, 16)
            .map(ImageHash)
            .map_err(|e| format!("Invalid image hash \"{}\": {}", s, e))
    }
}

impl TryFrom<String> for ImageHash {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ImageHash> for String {
    fn from(hash: ImageHash) -> String {
        hash.to_string()
    }
}

/// ITU-R BT.601 luma, scaled by 1000 to stay in integers.
fn luma_milli(r: u8, g: u8, b: u8) -> u64 {
    299 * r as u64 + 587 * g as u64 + 114 * b as u64
}

/// Pixel range covered by block `index` along an axis of length `len`.
fn block_span(index: u32, len: u32) -> (u32, u32) {
    let start = (index * len / GRID).min(len - 1);
    let end = ((index + 1) * len / GRID).max(start + 1).min(len);
    (start, end)
}

/// Computes the average hash of an image region.
pub fn average_hash<P: PixelAccess + ?Sized>(img: &P) -> ImageHash {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return ImageHash::ZERO;
    }

    let mut blocks = [0u64; (GRID * GRID) as usize];
    for by in 0..GRID {
        let (y0, y1) = block_span(by, height);
        for bx in 0..GRID {
            let (x0, x1) = block_span(bx, width);
            let mut total = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = img.pixel(x, y);
                    total += luma_milli(p[0], p[1], p[2]);
                }
            }
            let count = ((x1 - x0) * (y1 - y0)) as u64;
            blocks[(by * GRID + bx) as usize] = total / count;
        }
    }

    let mean = blocks.iter().sum::<u64>() / blocks.len() as u64;
    let bits = blocks
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value > mean)
        .fold(0u64, |acc, (i, _)| acc | 1 << (63 - i));

    ImageHash(bits)
}

//! Grid geometry: where tiles sit in a capture and on screen.
//!
//! The capture covers the game window's client area. Below a fixed header
//! strip the grid starts at the left edge; a footer strip (holding the mine
//! counter) follows the last row. Cells are addressed (column = x, row = y)
//! everywhere: cropping, neighbor lookup and click translation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::grid::Coord;
use crate::automation::config::SweeperConfig;
use crate::automation::platform::WindowInfo;

/// Position of the remaining-mine counter, relative to the grid's
/// bottom-right corner.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterRegion {
    /// Distance from the grid's right edge to the region's right edge
    pub right_margin: u32,
    /// Distance from the grid's bottom edge to the region's top edge
    pub top_margin: u32,
    /// Side length of the square region
    pub size: u32,
}

impl Default for CounterRegion {
    fn default() -> Self {
        Self {
            right_margin: 20,
            top_margin: 9,
            size: 16,
        }
    }
}

/// A pixel rectangle inside the capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Window placement and grid dimensions for one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Screen position of the capture's top-left pixel
    pub origin_x: i32,
    pub origin_y: i32,
    pub tile_size: u32,
    pub header_height: u32,
    pub footer_height: u32,
    /// Grid width in tiles
    pub columns: usize,
    /// Grid height in tiles
    pub rows: usize,
}

impl BoardGeometry {
    /// Derives the grid size from the window size.
    pub fn from_window(window: &WindowInfo, config: &SweeperConfig) -> Result<Self> {
        let tile_size = config.tile_size;
        if tile_size == 0 {
            return Err(anyhow!("tile_size must be positive"));
        }
        let chrome = config.header_height + config.footer_height;
        let columns = (window.width / tile_size) as usize;
        let rows = (window.height.saturating_sub(chrome) / tile_size) as usize;
        if columns == 0 || rows == 0 {
            return Err(anyhow!(
                "Window {}x{} is too small for a {} px grid (header {}, footer {})",
                window.width,
                window.height,
                tile_size,
                config.header_height,
                config.footer_height
            ));
        }

        Ok(Self {
            origin_x: window.origin_x,
            origin_y: window.origin_y,
            tile_size,
            header_height: config.header_height,
            footer_height: config.footer_height,
            columns,
            rows,
        })
    }

    /// The capture region of one tile.
    pub fn tile_rect(&self, coord: Coord) -> PixelRect {
        PixelRect {
            x: coord.x as u32 * self.tile_size,
            y: self.header_height + coord.y as u32 * self.tile_size,
            width: self.tile_size,
            height: self.tile_size,
        }
    }

    /// Screen coordinates of a tile's centre.
    pub fn cell_center(&self, coord: Coord) -> (i32, i32) {
        let half = (self.tile_size / 2) as i32;
        let tile = self.tile_size as i32;
        (
            self.origin_x + coord.x as i32 * tile + half,
            self.origin_y + self.header_height as i32 + coord.y as i32 * tile + half,
        )
    }

    /// The capture region of the remaining-mine counter.
    pub fn counter_rect(&self, region: &CounterRegion) -> PixelRect {
        let grid_right = self.columns as u32 * self.tile_size;
        let grid_bottom = self.header_height + self.rows as u32 * self.tile_size;
        PixelRect {
            x: grid_right.saturating_sub(region.right_margin + region.size),
            y: grid_bottom + region.top_margin,
            width: region.size,
            height: region.size,
        }
    }
}

//! Scripted game host and synthetic frames for controller tests.

use anyhow::Result;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::collections::VecDeque;

use super::config::{InputTiming, Shortcut, SweeperConfig};
use super::platform::{ClickKind, GameHost, WindowInfo};
use crate::board::{BoardGeometry, CounterRegion};
use crate::capture::RasterBuffer;
use crate::recognition::{average_hash, ClassificationTable, ImageHash, Tile};

pub const TILE: u32 = 32;
pub const HEADER: u32 = 22;
pub const FOOTER: u32 = 31;

/// Counter pattern standing in for "0 mines left": bright left half.
pub const ZERO_COUNTER: ImageHash = ImageHash(0xF0F0_F0F0_F0F0_F0F0);

/// One cell of a synthetic frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open,
    Hidden,
    One,
    Flag,
    Bomb,
    /// A glyph missing from the test table
    Strange,
}

impl Cell {
    fn bar(self) -> Option<u32> {
        match self {
            Cell::One => Some(1),
            Cell::Strange => Some(3),
            Cell::Flag => Some(5),
            Cell::Bomb => Some(6),
            Cell::Open | Cell::Hidden => None,
        }
    }

    fn pixel(self, x: u32, y: u32) -> Rgba<u8> {
        match self.bar() {
            Some(bar) => glyph(bar)(x, y),
            None if self == Cell::Open => Rgba([200, 200, 200, 255]),
            None => Rgba([90, 60, 140, 255]),
        }
    }
}

fn glyph(bar: u32) -> impl Fn(u32, u32) -> Rgba<u8> {
    move |x, _| {
        if x / 4 == bar {
            Rgba([250, 250, 250, 255])
        } else {
            Rgba([30, 30, 30, 255])
        }
    }
}

fn glyph_hash(bar: u32) -> ImageHash {
    let img: RgbaImage = ImageBuffer::from_fn(TILE, TILE, glyph(bar));
    average_hash(&img)
}

/// Table knowing the One, Flag and Bomb glyphs.
pub fn table() -> ClassificationTable {
    ClassificationTable::new().with_tiles([
        (glyph_hash(1), Tile::Number(1)),
        (glyph_hash(5), Tile::Flag),
        (glyph_hash(6), Tile::Bomb),
    ])
}

/// Default geometry with zero delays and the test zero-counter hash.
pub fn config() -> SweeperConfig {
    SweeperConfig {
        zero_counter_hash: ZERO_COUNTER,
        start_new_game: false,
        log_board: false,
        timing: InputTiming {
            press_ms: 0,
            release_ms: 0,
            activate_ms: 0,
            turn_delay_ms: 0,
            new_game_delay_ms: 0,
        },
        ..SweeperConfig::default()
    }
}

pub fn window(columns: u32, rows: u32) -> WindowInfo {
    WindowInfo {
        id: 1,
        owner_pid: 42,
        origin_x: 100,
        origin_y: 50,
        width: columns * TILE,
        height: HEADER + rows * TILE + FOOTER,
    }
}

/// Renders a client-area capture; rows are given top to bottom.
pub fn frame(cells: &[&[Cell]], zero_counter: bool) -> RasterBuffer {
    let rows = cells.len() as u32;
    let columns = cells[0].len() as u32;
    let mut img: RgbaImage = ImageBuffer::from_pixel(
        columns * TILE,
        HEADER + rows * TILE + FOOTER,
        Rgba([128, 128, 128, 255]),
    );
    for (y, row) in cells.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            for dy in 0..TILE {
                for dx in 0..TILE {
                    img.put_pixel(
                        x as u32 * TILE + dx,
                        HEADER + y as u32 * TILE + dy,
                        cell.pixel(dx, dy),
                    );
                }
            }
        }
    }
    if zero_counter {
        let geometry = BoardGeometry::from_window(&window(columns, rows), &config())
            .unwrap_or_else(|e| panic!("bad test geometry: {}", e));
        let rect = geometry.counter_rect(&CounterRegion::default());
        for dy in 0..rect.height {
            for dx in 0..rect.width / 2 {
                img.put_pixel(rect.x + dx, rect.y + dy, Rgba([255, 255, 255, 255]));
            }
        }
    }
    RasterBuffer::from_image(&img)
}

/// Replays frames in order, repeating the last one, and records input.
pub struct ScriptedHost {
    pub window: WindowInfo,
    pub frames: VecDeque<RasterBuffer>,
    pub clicks: Vec<(ClickKind, i32, i32)>,
    pub keys: Vec<Shortcut>,
    pub captures: usize,
}

impl ScriptedHost {
    pub fn new(window: WindowInfo, frames: Vec<RasterBuffer>) -> Self {
        Self {
            window,
            frames: frames.into(),
            clicks: Vec::new(),
            keys: Vec::new(),
            captures: 0,
        }
    }

    pub fn left_clicks(&self) -> Vec<(i32, i32)> {
        self.clicks_of(ClickKind::Left)
    }

    pub fn right_clicks(&self) -> Vec<(i32, i32)> {
        self.clicks_of(ClickKind::Right)
    }

    fn clicks_of(&self, kind: ClickKind) -> Vec<(i32, i32)> {
        self.clicks
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|&(_, x, y)| (x, y))
            .collect()
    }
}

impl GameHost for ScriptedHost {
    fn window_info(&mut self) -> Result<WindowInfo> {
        Ok(self.window)
    }

    fn capture(&mut self) -> Result<RasterBuffer> {
        self.captures += 1;
        let frame = if self.frames.len() > 1 {
            self.frames.pop_front()
        } else {
            self.frames.front().cloned()
        };
        frame.ok_or_else(|| anyhow::anyhow!("no frames scripted"))
    }

    fn click(&mut self, kind: ClickKind, screen_x: i32, screen_y: i32) -> Result<()> {
        self.clicks.push((kind, screen_x, screen_y));
        Ok(())
    }

    fn key_press(&mut self, shortcut: Shortcut) -> Result<()> {
        self.keys.push(shortcut);
        Ok(())
    }
}

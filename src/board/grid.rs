//! The classified grid and its neighbor statistics.

use std::fmt;

use crate::recognition::Tile;

/// Grid position: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Moore neighborhood of a cell, clipped at the grid edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    /// Neighbors in row-major order (top row first, left to right)
    pub cells: Vec<(Coord, Tile)>,
    pub unknown_count: usize,
    pub flag_count: usize,
}

impl Neighborhood {
    /// First unknown neighbor in enumeration order.
    pub fn first_unknown(&self) -> Option<Coord> {
        self.cells
            .iter()
            .find(|(_, tile)| tile.is_unknown())
            .map(|&(coord, _)| coord)
    }
}

/// Row-major grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// A board with every cell unrevealed.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Unknown; width * height],
        }
    }

    /// Builds a board from rows (`rows[y][x]`). Returns `None` for ragged input.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, coord: Coord) -> Tile {
        self.tiles[coord.y * self.width + coord.x]
    }

    pub fn set(&mut self, coord: Coord, tile: Tile) {
        self.tiles[coord.y * self.width + coord.x] = tile;
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1))
    }

    /// Coordinates holding `tile`, in row-major order.
    pub fn cells_with(&self, tile: Tile) -> Vec<Coord> {
        self.coords().filter(|&c| self.get(c) == tile).collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    pub fn has_bomb(&self) -> bool {
        self.tiles.contains(&Tile::Bomb)
    }

    /// Neighbors of (x, y), excluding the cell itself and anything off-grid.
    pub fn neighbors(&self, x: usize, y: usize) -> Neighborhood {
        let mut cells = Vec::with_capacity(8);
        let mut unknown_count = 0;
        let mut flag_count = 0;

        let y_range = y.saturating_sub(1)..(y + 2).min(self.height);
        for ny in y_range {
            let x_range = x.saturating_sub(1)..(x + 2).min(self.width);
            for nx in x_range {
                if nx == x && ny == y {
                    continue;
                }
                let coord = Coord::new(nx, ny);
                let tile = self.get(coord);
                match tile {
                    Tile::Unknown => unknown_count += 1,
                    Tile::Flag => flag_count += 1,
                    _ => {}
                }
                cells.push((coord, tile));
            }
        }

        Neighborhood {
            cells,
            unknown_count,
            flag_count,
        }
    }
}

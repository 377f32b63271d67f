//! Reading a whole board out of one capture.

use super::geometry::{BoardGeometry, CounterRegion};
use super::grid::{Board, Coord};
use crate::capture::RasterBuffer;
use crate::error::SweepError;
use crate::recognition::{average_hash, classify_tile, BlankProbe, ClassificationTable, ImageHash};

/// Classifies every cell of the capture into a fresh board.
///
/// Stops at the first tile that cannot be classified.
pub fn classify_all(
    raster: &RasterBuffer,
    geometry: &BoardGeometry,
    table: &ClassificationTable,
    probe: &BlankProbe,
) -> Result<Board, SweepError> {
    let mut board = Board::new(geometry.columns, geometry.rows);
    for y in 0..geometry.rows {
        for x in 0..geometry.columns {
            let coord = Coord { x, y };
            let rect = geometry.tile_rect(coord);
            let view = raster.view(rect.x, rect.y, rect.width, rect.height);
            let tile = classify_tile(&view, table, probe)
                .map_err(|source| SweepError::Classification { x, y, source })?;
            board.set(coord, tile);
        }
    }
    Ok(board)
}

/// Hashes the remaining-mine counter.
pub fn sample_counter(
    raster: &RasterBuffer,
    geometry: &BoardGeometry,
    region: &CounterRegion,
) -> ImageHash {
    let rect = geometry.counter_rect(region);
    average_hash(&raster.view(rect.x, rect.y, rect.width, rect.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::Tile;
    use image::{ImageBuffer, Rgba, RgbaImage};

    const TILE: u32 = 32;
    const HEADER: u32 = 22;
    const FOOTER: u32 = 31;

    fn geometry(columns: usize, rows: usize) -> BoardGeometry {
        BoardGeometry {
            origin_x: 0,
            origin_y: 0,
            tile_size: TILE,
            header_height: HEADER,
            footer_height: FOOTER,
            columns,
            rows,
        }
    }

    fn glyph(bar_x: u32) -> impl Fn(u32, u32) -> Rgba<u8> {
        move |x, _| {
            if x / 4 == bar_x {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([30, 30, 30, 255])
            }
        }
    }

    /// Renders a capture where each cell is flat light (open), flat dark
    /// (unknown) or a bar glyph (bar column given).
    fn render(cells: &[&[Option<u32>]], open: &[(usize, usize)]) -> RgbaImage {
        let rows = cells.len() as u32;
        let columns = cells[0].len() as u32;
        let mut img: RgbaImage = ImageBuffer::from_pixel(
            columns * TILE,
            HEADER + rows * TILE + FOOTER,
            Rgba([128, 128, 128, 255]),
        );
        for (y, row) in cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let x0 = x as u32 * TILE;
                let y0 = HEADER + y as u32 * TILE;
                for dy in 0..TILE {
                    for dx in 0..TILE {
                        let p = match cell {
                            Some(bar) => glyph(*bar)(dx, dy),
                            None if open.contains(&(x, y)) => Rgba([200, 200, 200, 255]),
                            None => Rgba([90, 60, 140, 255]),
                        };
                        img.put_pixel(x0 + dx, y0 + dy, p);
                    }
                }
            }
        }
        img
    }

    fn table() -> ClassificationTable {
        let one: RgbaImage = ImageBuffer::from_fn(TILE, TILE, glyph(1));
        let flag: RgbaImage = ImageBuffer::from_fn(TILE, TILE, glyph(5));
        ClassificationTable::new()
            .with_tiles([(average_hash(&one), Tile::Number(1)), (average_hash(&flag), Tile::Flag)])
    }

    #[test]
    fn test_classify_all_row_major() {
        let img = render(
            &[&[None, Some(1), None], &[Some(5), None, None]],
            &[(0, 0), (2, 1)],
        );
        let raster = RasterBuffer::from_image(&img);
        let board = classify_all(&raster, &geometry(3, 2), &table(), &BlankProbe::default())
            .unwrap();

        assert_eq!(board.get(Coord::new(0, 0)), Tile::OpenSpace);
        assert_eq!(board.get(Coord::new(1, 0)), Tile::Number(1));
        assert_eq!(board.get(Coord::new(2, 0)), Tile::Unknown);
        assert_eq!(board.get(Coord::new(0, 1)), Tile::Flag);
        assert_eq!(board.get(Coord::new(1, 1)), Tile::Unknown);
        assert_eq!(board.get(Coord::new(2, 1)), Tile::OpenSpace);
    }

    #[test]
    fn test_unmapped_cell_aborts_pass() {
        // Bar in column 3 is not in the table
        let img = render(&[&[None, None], &[None, Some(3)]], &[]);
        let raster = RasterBuffer::from_image(&img);
        let err = classify_all(&raster, &geometry(2, 2), &table(), &BlankProbe::default())
            .unwrap_err();

        match err {
            SweepError::Classification { x, y, source } => {
                assert_eq!((x, y), (1, 1));
                assert_eq!(source.image.dimensions(), (TILE, TILE));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sample_counter_reads_footer() {
        let mut img = render(&[&[None, None]], &[]);
        let g = geometry(2, 1);
        let rect = g.counter_rect(&CounterRegion::default());
        // Bright left half inside the counter region
        for dy in 0..rect.height {
            for dx in 0..rect.width / 2 {
                img.put_pixel(rect.x + dx, rect.y + dy, Rgba([255, 255, 255, 255]));
            }
        }
        let raster = RasterBuffer::from_image(&img);
        let hash = sample_counter(&raster, &g, &CounterRegion::default());
        assert_eq!(hash, ImageHash(0xF0F0_F0F0_F0F0_F0F0));
    }
}

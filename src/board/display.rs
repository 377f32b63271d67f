//! Text rendering of boards, for the log only.

use super::grid::Board;
use crate::recognition::Tile;

/// One-character symbol for a tile.
pub fn tile_symbol(tile: Tile) -> char {
    match tile {
        Tile::OpenSpace => '.',
        Tile::Number(n) => char::from_digit(n as u32, 10).unwrap_or('#'),
        Tile::Flag => 'F',
        Tile::Bomb => '*',
        Tile::Unknown => '?',
    }
}

/// Board rows as `[ ? 1 . F ]` lines, top to bottom.
pub fn render_rows(board: &Board) -> Vec<String> {
    board
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|&t| tile_symbol(t).to_string()).collect();
            format!("[ {} ]", cells.join(" "))
        })
        .collect()
}

/// Writes the board to the log, one line per row.
pub fn log_board(board: &Board) {
    for line in render_rows(board) {
        crate::log(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(tile_symbol(Tile::OpenSpace), '.');
        assert_eq!(tile_symbol(Tile::Number(7)), '7');
        assert_eq!(tile_symbol(Tile::Flag), 'F');
        assert_eq!(tile_symbol(Tile::Bomb), '*');
        assert_eq!(tile_symbol(Tile::Unknown), '?');
    }

    #[test]
    fn test_render_rows() {
        let board = Board::from_rows(vec![
            vec![Tile::Unknown, Tile::Number(1)],
            vec![Tile::OpenSpace, Tile::Flag],
        ])
        .unwrap();
        assert_eq!(render_rows(&board), vec!["[ ? 1 ]", "[ . F ]"]);
    }
}

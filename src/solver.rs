//! Move selection.
//!
//! Two local rules, applied to each number tile in row-major order:
//! - Flag completion: if the unknown neighbors exactly cover the mines not
//!   yet flagged, each of them is a mine.
//! - Safe reveal: if the flags already account for every mine, each unknown
//!   neighbor is safe.
//!
//! Both are sound, neither is complete. When no rule applies anywhere a random
//! unknown cell is revealed, so the game always progresses. Only one move is
//! produced per call: the board has to be observed again before the next one.

use rand::Rng;
use std::fmt;

use crate::board::{Board, Coord};
use crate::recognition::Tile;

/// A move on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Mark as a mine (right click)
    Flag(Coord),
    /// Open the cell (left click)
    Reveal(Coord),
}

impl Action {
    pub fn coord(self) -> Coord {
        match self {
            Action::Flag(c) | Action::Reveal(c) => c,
        }
    }
}

/// Which rule produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    FlagCompletion,
    SafeReveal,
    RandomGuess,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::FlagCompletion => write!(f, "flag completion"),
            Rule::SafeReveal => write!(f, "safe reveal"),
            Rule::RandomGuess => write!(f, "random guess"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub rule: Rule,
    /// The number tile that justified the move (none for guesses)
    pub source: Option<Coord>,
}

/// Picks the next move, or `None` if no cell is left to reveal.
pub fn decide<R: Rng>(board: &Board, rng: &mut R) -> Option<Decision> {
    deduce(board).or_else(|| guess(board, rng))
}

/// Applies the two rules; first hit in row-major order wins.
pub fn deduce(board: &Board) -> Option<Decision> {
    for coord in board.coords() {
        let Some(mines) = board.get(coord).mine_count() else {
            continue;
        };
        let mines = mines as usize;
        let n = board.neighbors(coord.x, coord.y);
        let Some(target) = n.first_unknown() else {
            continue;
        };

        if mines.checked_sub(n.flag_count) == Some(n.unknown_count) {
            return Some(Decision {
                action: Action::Flag(target),
                rule: Rule::FlagCompletion,
                source: Some(coord),
            });
        }
        if n.flag_count == mines {
            return Some(Decision {
                action: Action::Reveal(target),
                rule: Rule::SafeReveal,
                source: Some(coord),
            });
        }
    }
    None
}

/// Reveals a uniformly random unknown cell.
pub fn guess<R: Rng>(board: &Board, rng: &mut R) -> Option<Decision> {
    let unknown = board.cells_with(Tile::Unknown);
    if unknown.is_empty() {
        return None;
    }
    let target = unknown[rng.random_range(0..unknown.len())];
    Some(Decision {
        action: Action::Reveal(target),
        rule: Rule::RandomGuess,
        source: None,
    })
}

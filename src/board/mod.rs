//! Board state for one game window.
//!
//! This module provides:
//! - Grid geometry and screen-coordinate translation (`BoardGeometry`)
//! - The classified grid with neighbor statistics (`Board`)
//! - Whole-capture classification and the mine-counter hash (`classify_all`)
//! - Log formatting for boards (`log_board`)

pub mod display;
pub mod geometry;
pub mod grid;
pub mod observe;

pub use display::log_board;
pub use geometry::{BoardGeometry, CounterRegion, PixelRect};
pub use grid::{Board, Coord, Neighborhood};
pub use observe::{classify_all, sample_counter};

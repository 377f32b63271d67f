//! Screen capture.
//!
//! This module provides:
//! - Pixel access over captured frames (`RasterBuffer`, `PixelAccess`)
//! - Window discovery (`find_window`, Windows only)
//! - Frame capture (`capture_window_to_raster`, Windows only)

pub mod raster;
#[cfg(windows)]
pub mod screenshot;
#[cfg(windows)]
pub mod window;

pub use raster::{to_image, PixelAccess, RasterBuffer, RasterView};
#[cfg(windows)]
pub use screenshot::capture_window_to_raster;
#[cfg(windows)]
pub use window::{activate_window, find_window, window_info};

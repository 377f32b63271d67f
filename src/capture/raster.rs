//! Pixel access over captured window frames.
//!
//! Captures arrive as a packed RGBA byte buffer with a row stride. The
//! classifier and board logic only see the `PixelAccess` trait, so they work
//! the same on a full frame, a borrowed crop of it, or an `image::RgbaImage`
//! built in tests.

use anyhow::{anyhow, Result};
use image::{ImageBuffer, Rgba, RgbaImage};

/// Read-only access to an RGBA pixel grid.
pub trait PixelAccess {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Returns the pixel at local coordinates. Panics if out of range.
    fn pixel(&self, x: u32, y: u32) -> Rgba<u8>;
}

/// A captured frame: RGBA bytes, `stride` bytes per row.
#[derive(Clone, Debug)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wraps raw RGBA bytes. `stride` may exceed `width * 4` (row padding).
    pub fn from_raw(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self> {
        let row_bytes = width as usize * 4;
        if stride < row_bytes {
            return Err(anyhow!(
                "Row stride {} is smaller than {} bytes per row",
                stride,
                row_bytes
            ));
        }
        let needed = if height == 0 {
            0
        } else {
            stride * (height as usize - 1) + row_bytes
        };
        if data.len() < needed {
            return Err(anyhow!(
                "Raster buffer too small: {} bytes for {}x{} (stride {})",
                data.len(),
                width,
                height,
                stride
            ));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Copies an `RgbaImage` into a tightly packed buffer.
    #[cfg(test)]
    pub fn from_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            stride: width as usize * 4,
            data: img.as_raw().clone(),
        }
    }

    #[cfg(test)]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Borrows a rectangular region, clamped to the buffer bounds.
    pub fn view(&self, x: u32, y: u32, width: u32, height: u32) -> RasterView<'_> {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        RasterView {
            raster: self,
            x: x0,
            y: y0,
            width: width.min(self.width - x0),
            height: height.min(self.height - y0),
        }
    }
}

impl PixelAccess for RasterBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of range", x, y);
        let offset = y as usize * self.stride + x as usize * 4;
        let p = &self.data[offset..offset + 4];
        Rgba([p[0], p[1], p[2], p[3]])
    }
}

/// A borrowed crop of a `RasterBuffer`. Coordinates are local to the crop.
#[derive(Clone, Copy, Debug)]
pub struct RasterView<'a> {
    raster: &'a RasterBuffer,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl PixelAccess for RasterView<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of range", x, y);
        self.raster.pixel(self.x + x, self.y + y)
    }
}

impl PixelAccess for ImageBuffer<Rgba<u8>, Vec<u8>> {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.get_pixel(x, y)
    }
}

/// Copies any pixel source into an owned image (for saving diagnostics).
pub fn to_image<P: PixelAccess + ?Sized>(src: &P) -> RgbaImage {
    ImageBuffer::from_fn(src.width(), src.height(), |x, y| src.pixel(x, y))
}

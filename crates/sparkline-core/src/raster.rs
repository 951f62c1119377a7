//! Monochrome raster surface.
//!
//! Lines are rasterized with Bresenham's algorithm on integer pixel centers.
//! Coordinates are rounded and clipped to the grid, so a segment ending
//! exactly on `width` or `height` lands on the last row/column.

use crate::surface::{Point, Surface};

/// Width × height grid of on/off pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Whether the pixel at `(x, y)` is lit. Out of range reads as unlit.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Rows of `on`/`off` characters, top row first, newline separated.
    pub fn to_ascii(&self, on: char, off: char) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                out.push(if self.get(x, y) { on } else { off });
            }
        }
        out
    }

    fn set(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = true;
    }

    /// Round to the nearest pixel and pull the far edge back onto the grid.
    fn snap(&self, p: Point) -> (i64, i64) {
        let max_x = self.width.saturating_sub(1) as f64;
        let max_y = self.height.saturating_sub(1) as f64;
        (
            p.x.round().clamp(0.0, max_x) as i64,
            p.y.round().clamp(0.0, max_y) as i64,
        )
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(false);
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        if !self.is_drawable() {
            return;
        }
        let (mut x0, mut y0) = self.snap(from);
        let (x1, y1) = self.snap(to);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_point(&mut self, at: Point) {
        if !self.is_drawable() {
            return;
        }
        let (x, y) = self.snap(at);
        self.set(x, y);
    }
}

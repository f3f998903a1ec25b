//! Persistent terrain mask
//!
//! A single-channel raster at twice the viewport resolution. It is both the
//! collision world and the painted background: explosions erase it, buildings
//! and the planet core are painted into it, and shop zones are stored in it as
//! distinct color values.
//!
//! Cell `(ix, iy)` covers world point `(x, y)` when
//! `ix = floor(x * 2 + width)` and `iy = floor(y * 2 + height)`.

use glam::Vec2;

use crate::consts::{HEIGHT, PLANET_RADIUS, WIDTH};

/// Nothing there
pub const EMPTY: u8 = 0;
/// Solid rock; the only value the taxi collides with
pub const SOLID: u8 = 255;

/// Raster terrain covering the whole viewport
#[derive(Debug, Clone)]
pub struct TerrainMask {
    width: usize,
    height: usize,
    /// World-to-raster offset (viewport size in world units)
    offset: Vec2,
    cells: Vec<u8>,
}

impl Default for TerrainMask {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainMask {
    /// Session-start mask: empty with the solid planet at the origin
    pub fn new() -> Self {
        let mut mask = Self::with_viewport(WIDTH, HEIGHT);
        mask.paint_circle(Vec2::ZERO, PLANET_RADIUS, SOLID);
        mask
    }

    /// Empty mask for a viewport of `width` x `height` world units
    pub fn with_viewport(width: u32, height: u32) -> Self {
        let w = width as usize * 2;
        let h = height as usize * 2;
        Self {
            width: w,
            height: h,
            offset: Vec2::new(width as f32, height as f32),
            cells: vec![EMPTY; w * h],
        }
    }

    /// Raster dimensions in cells
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Raw rows, bottom row first (for texture upload)
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Map a world position into continuous raster coordinates
    #[inline]
    fn to_raster(&self, world: Vec2) -> Vec2 {
        world * 2.0 + self.offset
    }

    #[inline]
    fn index(&self, ix: i64, iy: i64) -> Option<usize> {
        if ix < 0 || iy < 0 || ix >= self.width as i64 || iy >= self.height as i64 {
            None
        } else {
            Some(iy as usize * self.width + ix as usize)
        }
    }

    /// Cell value; cells off the raster read as empty
    #[inline]
    fn cell(&self, ix: i64, iy: i64) -> u8 {
        self.index(ix, iy).map_or(EMPTY, |i| self.cells[i])
    }

    /// Value under a single world point
    pub fn value_at(&self, world: Vec2) -> u8 {
        let p = self.to_raster(world);
        self.cell(p.x.floor() as i64, p.y.floor() as i64)
    }

    /// True iff the point is empty terrain
    pub fn is_free(&self, world: Vec2) -> bool {
        self.value_at(world) == EMPTY
    }

    /// Read a `window` x `window` block of cells centered on `world`.
    ///
    /// The result is row-major, bottom row first. Off-raster cells are empty.
    pub fn sample(&self, world: Vec2, window: usize) -> Vec<u8> {
        let p = self.to_raster(world);
        let x0 = p.x.floor() as i64 - (window / 2) as i64;
        let y0 = p.y.floor() as i64 - (window / 2) as i64;

        let mut out = Vec::with_capacity(window * window);
        for dy in 0..window as i64 {
            for dx in 0..window as i64 {
                out.push(self.cell(x0 + dx, y0 + dy));
            }
        }
        out
    }

    /// Fill every cell touching the disk of world radius `radius`
    pub fn paint_circle(&mut self, center: Vec2, radius: f32, value: u8) {
        let c = self.to_raster(center);
        let rr = (radius * 2.0).max(0.0);
        let rr2 = rr * rr;

        let (x_lo, x_hi) = self.clamp_span(c.x - rr, c.x + rr, self.width);
        let (y_lo, y_hi) = self.clamp_span(c.y - rr, c.y + rr, self.height);

        for iy in y_lo..y_hi {
            // Closest point of the cell to the disk center
            let qy = c.y.clamp(iy as f32, iy as f32 + 1.0) - c.y;
            let row = iy * self.width;
            for ix in x_lo..x_hi {
                let qx = c.x.clamp(ix as f32, ix as f32 + 1.0) - c.x;
                if qx * qx + qy * qy <= rr2 {
                    self.cells[row + ix] = value;
                }
            }
        }
    }

    /// Fill a rectangle of world size `size * scale` centered on `center`,
    /// rotated by `angle_deg` counter-clockwise.
    pub fn paint_rect(&mut self, center: Vec2, size: Vec2, angle_deg: f32, scale: f32, value: u8) {
        let c = self.to_raster(center);
        let half = size * scale; // world half-extent doubled into raster units
        let reach = half.length();
        let (sin, cos) = angle_deg.to_radians().sin_cos();

        let (x_lo, x_hi) = self.clamp_span(c.x - reach, c.x + reach, self.width);
        let (y_lo, y_hi) = self.clamp_span(c.y - reach, c.y + reach, self.height);

        for iy in y_lo..y_hi {
            let dy = iy as f32 + 0.5 - c.y;
            let row = iy * self.width;
            for ix in x_lo..x_hi {
                let dx = ix as f32 + 0.5 - c.x;
                // Rotate into the rectangle's frame
                let lx = dx * cos + dy * sin;
                let ly = -dx * sin + dy * cos;
                if lx.abs() <= half.x && ly.abs() <= half.y {
                    self.cells[row + ix] = value;
                }
            }
        }
    }

    /// Number of cells holding `value`
    pub fn count(&self, value: u8) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// Clamp a continuous [lo, hi] range to cell indices [start, end)
    fn clamp_span(&self, lo: f32, hi: f32, len: usize) -> (usize, usize) {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.floor() + 1.0).clamp(0.0, len as f32) as usize;
        (start.min(len), end)
    }
}

//! Owned RGBA8 pixel buffer.
//!
//! Noise frames are produced as `Raster`s and handed to the canvas as-is. The
//! same type doubles as a software [`Surface`](crate::transition::Surface) and
//! bitmap source, which is what the host tests draw on.

use crate::transition::Surface;

/// Row-major RGBA8 raster, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes, ready for `ImageData`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let k = self.offset(x, y);
        [self.data[k], self.data[k + 1], self.data[k + 2], self.data[k + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let k = self.offset(x, y);
        self.data[k..k + 4].copy_from_slice(&rgba);
    }

    /// Fill the rectangle `[x0, x1) x [y0, y1)` with one color.
    pub fn fill(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, rgba: [u8; 4]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.set_pixel(x, y, rgba);
            }
        }
    }

    /// Integer pixel span covered by `[start, start + len)`, clipped to `limit`.
    fn span(start: f64, len: f64, limit: u32) -> (u32, u32) {
        let lo = start.floor().clamp(0.0, limit as f64) as u32;
        let hi = (start + len).ceil().clamp(0.0, limit as f64) as u32;
        (lo, hi.max(lo))
    }
}

impl Surface<Raster> for Raster {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (x0, x1) = Self::span(x, w, self.width);
        let (y0, y1) = Self::span(y, h, self.height);
        self.fill(x0, y0, x1, y1, [0; 4]);
    }

    fn draw_image(&mut self, image: &Raster) {
        let (w, h) = (self.width.min(image.width), self.height.min(image.height));
        for y in 0..h {
            for x in 0..w {
                self.set_pixel(x, y, image.pixel(x, y));
            }
        }
    }

    // Unscaled copy; source and destination spans have equal size in practice.
    fn draw_image_region(
        &mut self,
        image: &Raster,
        (sx, sy, sw, sh): (f64, f64, f64, f64),
        (dx, dy): (f64, f64),
    ) {
        let (sx0, sx1) = Self::span(sx, sw, image.width);
        let (sy0, sy1) = Self::span(sy, sh, image.height);
        let (dx0, dy0) = (dx.floor().max(0.0) as u32, dy.floor().max(0.0) as u32);
        for (row, sy) in (sy0..sy1).enumerate() {
            let ty = dy0 + row as u32;
            if ty >= self.height {
                break;
            }
            for (col, sx) in (sx0..sx1).enumerate() {
                let tx = dx0 + col as u32;
                if tx >= self.width {
                    break;
                }
                self.set_pixel(tx, ty, image.pixel(sx, sy));
            }
        }
    }
}

//! Noise overlay state: the frame pool, its playback cursor and the scan band.
//!
//! All positions live in internal (low resolution) canvas pixels. Motion is
//! measured in logical frames of `target_fps`, so callers pass the real elapsed
//! time and playback speed stays fixed regardless of the actual frame rate.

use crate::config::NoiseConfig;
use crate::entropy::Entropy;
use crate::noise;
use crate::raster::Raster;

/// White gradient stops `(offset, alpha)` across the scan band: a dim leading
/// shoulder, a bright core at the middle and a soft trailing falloff.
pub const SCAN_STOPS: [(f64, f64); 9] = [
    (0.0, 0.0),
    (0.1, 0.0),
    (0.2, 0.2),
    (0.3, 0.0),
    (0.45, 0.1),
    (0.5, 1.0),
    (0.55, 0.55),
    (0.6, 0.25),
    (1.0, 0.0),
];

/// Vertical extent of the scan band, `[top, top + height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanBand {
    pub top: f64,
    pub height: f64,
}

impl ScanBand {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

pub struct NoiseField {
    config: NoiseConfig,
    width: u32,
    height: u32,
    samples: Vec<Raster>,
    sample_index: f64,
    scan_offset_y: f64,
    scan_height: f64,
}

impl NoiseField {
    /// Empty field; nothing is drawable until the first [`resize`](Self::resize).
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            config,
            width: 0,
            height: 0,
            samples: Vec::new(),
            sample_index: 0.0,
            scan_offset_y: 0.0,
            scan_height: 0.0,
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Internal canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn samples(&self) -> &[Raster] {
        &self.samples
    }

    pub fn sample_index(&self) -> f64 {
        self.sample_index
    }

    pub fn scan_offset_y(&self) -> f64 {
        self.scan_offset_y
    }

    pub fn scan_height(&self) -> f64 {
        self.scan_height
    }

    /// Internal dimensions for a host element of `display_w x display_h` CSS
    /// pixels. Never smaller than 1x1.
    pub fn internal_size(&self, display_w: f64, display_h: f64) -> (u32, u32) {
        let width = (display_w / self.config.scale_factor).max(0.0) as u32;
        let height = if display_w > 0.0 && display_h > 0.0 {
            (width as f64 / (display_w / display_h)) as u32
        } else {
            0
        };
        (width.max(1), height.max(1))
    }

    /// Recompute geometry for a new display size and regenerate the whole pool.
    pub fn resize<E: Entropy>(
        &mut self,
        display_w: f64,
        display_h: f64,
        rng: &mut E,
    ) -> (u32, u32) {
        let (width, height) = self.internal_size(display_w, display_h);
        self.width = width;
        self.height = height;
        self.scan_height = display_h.max(0.0) / self.config.scale_factor / 3.0;

        self.samples.clear();
        self.samples
            .extend((0..self.config.sample_count).map(|_| noise::generate(width, height, rng)));
        if self.sample_index >= self.samples.len() as f64 {
            self.sample_index = 0.0;
        }

        log::debug!(
            "noise pool regenerated: {} frames at {}x{}",
            self.samples.len(),
            width,
            height
        );
        (width, height)
    }

    /// Frame to blit this tick, `None` before the first resize.
    pub fn current_sample(&self) -> Option<&Raster> {
        self.samples.get(self.sample_index.floor() as usize)
    }

    pub fn scan_band(&self) -> ScanBand {
        ScanBand {
            top: self.scan_offset_y,
            height: self.scan_height,
        }
    }

    /// Advance by `elapsed_ms` of wall time.
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.advance(elapsed_ms.max(0.0) * self.config.target_fps / 1000.0);
    }

    /// Advance by `frames` logical frames.
    pub fn advance(&mut self, frames: f64) {
        self.sample_index += self.config.sample_step() * frames;
        if self.sample_index >= self.samples.len() as f64 {
            self.sample_index = 0.0;
        }

        let height = self.height as f64;
        self.scan_offset_y += height / self.config.scan_speed() * frames;
        if self.scan_offset_y > height {
            self.scan_offset_y = -(self.scan_height / 2.0);
        }
    }
}

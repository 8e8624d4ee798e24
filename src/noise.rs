//! Noise frame synthesis.
//!
//! A frame is uniform gray static plus a slowly varying per-row brightness
//! bias, so the pool reads as a badly tuned CRT with faint horizontal banding.

use crate::entropy::Entropy;
use crate::raster::Raster;

/// Number of vertical bands the intensity curve is built from.
const BANDS: f64 = 50.0;
/// Band intensities are drawn from `[0, MAX_BAND_INTENSITY)`.
const MAX_BAND_INTENSITY: f64 = 15.0;
/// Static gray values are drawn from `[0, STATIC_LEVELS)`.
const STATIC_LEVELS: f64 = 36.0;
/// Largest per-frame opacity drop.
const MAX_FLICKER: f64 = 0.05;

/// Line through `(x0, y0)` and `(x1, y1)` evaluated at `x`.
pub fn interpolate(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    y0 + (y1 - y0) * ((x - x0) / (x1 - x0))
}

/// Smoothed per-row brightness bias for a frame `height` rows tall.
pub fn intensity_curve<E: Entropy>(height: u32, rng: &mut E) -> Vec<f64> {
    let factor = height as f64 / BANDS;
    // one trailing band for the interpolation lookahead
    let bands = (height as f64 / factor).floor() as usize + 2;
    let curve: Vec<f64> = (0..bands)
        .map(|_| (rng.next_f64() * MAX_BAND_INTENSITY).floor())
        .collect();

    (0..height)
        .map(|row| {
            let pos = row as f64 / factor;
            let band = (pos.floor() as usize).min(bands - 2);
            interpolate(
                pos,
                band as f64,
                curve[band],
                band as f64 + 1.0,
                curve[band + 1],
            )
        })
        .collect()
}

/// Generate one noise frame of `width x height` pixels.
///
/// Every pixel is gray (R == G == B) and the whole frame shares one alpha
/// slightly below opaque.
pub fn generate<E: Entropy>(width: u32, height: u32, rng: &mut E) -> Raster {
    let trans = 1.0 - rng.next_f64() * MAX_FLICKER;
    let alpha = (255.0 * trans).round() as u8;
    let rows = intensity_curve(height, rng);

    let mut frame = Raster::new(width, height);
    let w = width as usize;
    for (i, px) in frame.data_mut().chunks_exact_mut(4).enumerate() {
        let gray = (STATIC_LEVELS * rng.next_f64()).floor() + rows[i / w];
        let gray = gray.round().clamp(0.0, 255.0) as u8;
        px.copy_from_slice(&[gray, gray, gray, alpha]);
    }
    frame
}

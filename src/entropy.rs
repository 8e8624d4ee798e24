//! Uniform random sources.

use rand::{Rng, RngCore};

/// A uniform `[0, 1)` source, the only randomness the effects need.
pub trait Entropy {
    fn next_f64(&mut self) -> f64;

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

impl<R: RngCore> Entropy for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// `Math.random()` from the JS host, exposed as a `rand` generator.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct MathRandom;

#[cfg(target_arch = "wasm32")]
impl RngCore for MathRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    // 53 random bits in the high end, which is what `gen::<f64>()` reads back
    fn next_u64(&mut self) -> u64 {
        ((js_sys::Math::random() * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

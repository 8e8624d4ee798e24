//! Tunables for both effects.
//!
//! Defaults reproduce the stock look. Pages can override any field through
//! `data-*` attributes; the browser layer hands us a lookup closure over the
//! element's dataset so parsing stays testable off-browser.

use std::str::FromStr;

/// Noise overlay settings, read from the `#tv` canvas dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseConfig {
    /// Display pixels per internal noise pixel.
    pub scale_factor: f64,
    /// Frames in the precomputed pool.
    pub sample_count: usize,
    /// Assumed render rate; motion is expressed in these logical frames.
    pub target_fps: f64,
    /// Noise frames shown per logical second.
    pub playback_rate: f64,
    /// Seconds for the scan band to travel top to bottom.
    pub scan_seconds: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale_factor: 2.5,
            sample_count: 10,
            target_fps: 60.0,
            playback_rate: 20.0,
            scan_seconds: 15.0,
        }
    }
}

impl NoiseConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            scale_factor: parse_or(&lookup, "scaleFactor", d.scale_factor, |v| *v > 0.0),
            sample_count: parse_or(&lookup, "sampleCount", d.sample_count, |v| *v > 0),
            target_fps: parse_or(&lookup, "fps", d.target_fps, |v| *v > 0.0),
            playback_rate: parse_or(&lookup, "playbackRate", d.playback_rate, |v| *v > 0.0),
            scan_seconds: parse_or(&lookup, "scanSeconds", d.scan_seconds, |v| *v > 0.0),
        }
    }

    /// Sample cursor advance per logical frame.
    pub fn sample_step(&self) -> f64 {
        self.playback_rate / self.target_fps
    }

    /// Logical frames for one full scan traversal.
    pub fn scan_speed(&self) -> f64 {
        self.target_fps * self.scan_seconds
    }
}

/// Panel cycler settings, read from the `<body>` dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleConfig {
    /// Time a panel stays up before its conceal starts, in ms.
    pub dwell_ms: f64,
    /// Render ticks per transition, minus one.
    pub step_to: u32,
    /// Most extra strips torn in a single tick.
    pub step_mul: u32,
    /// Upper bound of the random delay between ticks, in ms.
    pub max_step_delay_ms: f64,
    /// Selector for the ring members, in document order.
    pub panel_selector: String,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3000.0,
            step_to: 4,
            step_mul: 10,
            max_step_delay_ms: 250.0,
            panel_selector: ".item".to_string(),
        }
    }
}

impl CycleConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            dwell_ms: parse_or(&lookup, "dwellMs", d.dwell_ms, |v| *v >= 0.0),
            step_to: parse_or(&lookup, "stepTo", d.step_to, |v| *v > 0),
            step_mul: parse_or(&lookup, "stepMul", d.step_mul, |_| true),
            max_step_delay_ms: parse_or(&lookup, "maxStepDelayMs", d.max_step_delay_ms, |v| {
                *v >= 0.0
            }),
            panel_selector: lookup("panelSelector")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(d.panel_selector),
        }
    }
}

// Dataset keys are camelCase: `data-scale-factor` arrives as `scaleFactor`.
fn parse_or<T, F>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T, valid: F) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
    F: Fn(&T) -> bool,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if valid(&v) => v,
        _ => {
            log::warn!("ignoring data-{key}={raw:?}, using {default:?}");
            default
        }
    }
}

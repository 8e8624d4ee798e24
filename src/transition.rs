//! Slice-tear transition.
//!
//! A transition paints a snapshot of one panel onto a scratch surface and
//! tears random horizontal strips out of it: each strip is split at some `x`
//! and its two halves are swapped. Concealing starts nearly intact and tears
//! harder every tick; revealing runs the other way.
//!
//! The state machine is `Pending -> Animating(0..=step_to) -> Done`. It leaves
//! from `Pending` only once it holds a snapshot *and* has been armed, in
//! whichever order those arrive.

use crate::config::CycleConfig;
use crate::entropy::Entropy;

/// Minimal 2D drawing surface the tear effect needs.
pub trait Surface<B> {
    /// Drawable size in surface pixels.
    fn size(&self) -> (f64, f64);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Draw the whole image over the whole surface.
    fn draw_image(&mut self, image: &B);
    /// Copy the source rectangle `(sx, sy, sw, sh)` to `(dx, dy)` at the same size.
    fn draw_image_region(&mut self, image: &B, src: (f64, f64, f64, f64), dst: (f64, f64));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Revealing,
    Concealing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the snapshot, the go signal, or both.
    Pending,
    /// Next render draws this step.
    Animating(u32),
    Done,
}

/// Outcome of one [`Transition::render`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Render again after `delay_ms`.
    Next { delay_ms: f64 },
    /// Last step drawn; the scratch surface can go.
    Complete,
    /// Not animating; nothing was drawn.
    Idle,
}

/// One torn strip: rows `[y, y + h)` split at column `x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strip {
    pub x: f64,
    pub y: f64,
    pub h: f64,
}

impl Strip {
    pub fn random<E: Entropy>(width: f64, height: f64, rng: &mut E) -> Self {
        let x = rng.range(0.0, width / 2.0);
        let y = rng.range(0.0, height);
        let h = 2.0 + 30.0 * rng.next_f64();
        Self { x, y, h }
    }
}

/// Swap the halves of `strip` around its split.
///
/// Afterwards columns `[x, width)` hold the source's `[0, width - x)` and
/// columns `[0, x)` hold the source's `[width - x, width)`.
pub fn tear_strip<B, S: Surface<B> + ?Sized>(surface: &mut S, image: &B, width: f64, strip: Strip) {
    let Strip { x, y, h } = strip;
    let rest = width - x;
    surface.clear_rect(x, y, rest, h);
    surface.clear_rect(0.0, y, x, h);
    surface.draw_image_region(image, (0.0, y, rest, h), (x, y));
    surface.draw_image_region(image, (rest, y, x, h), (0.0, y));
}

pub struct Transition<B> {
    direction: Direction,
    step_to: u32,
    step_mul: u32,
    max_step_delay_ms: f64,
    phase: Phase,
    armed: bool,
    snapshot: Option<B>,
}

impl<B> Transition<B> {
    pub fn new(direction: Direction, config: &CycleConfig) -> Self {
        Self {
            direction,
            step_to: config.step_to,
            step_mul: config.step_mul,
            max_step_delay_ms: config.max_step_delay_ms,
            phase: Phase::Pending,
            armed: false,
            snapshot: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Hand over the captured bitmap. Returns `true` if animation starts now.
    ///
    /// Only the first snapshot is kept; later deliveries are dropped.
    pub fn deliver(&mut self, snapshot: B) -> bool {
        if self.phase != Phase::Pending || self.snapshot.is_some() {
            return false;
        }
        self.snapshot = Some(snapshot);
        self.try_start()
    }

    /// Give the go signal. Returns `true` if animation starts now.
    pub fn arm(&mut self) -> bool {
        if self.phase != Phase::Pending {
            return false;
        }
        self.armed = true;
        self.try_start()
    }

    fn try_start(&mut self) -> bool {
        if self.armed && self.snapshot.is_some() {
            self.phase = Phase::Animating(0);
            true
        } else {
            false
        }
    }

    /// Strips torn at `step`.
    pub fn strip_count(&self, step: u32) -> u32 {
        let mut inc = step as f64 / self.step_to as f64;
        if self.direction == Direction::Revealing {
            inc = 1.0 - inc;
        }
        (inc * self.step_mul as f64).floor() as u32 + 1
    }

    /// Draw the current step onto `surface`.
    pub fn render<S, E>(&mut self, surface: &mut S, rng: &mut E) -> Tick
    where
        S: Surface<B> + ?Sized,
        E: Entropy,
    {
        let step = match self.phase {
            Phase::Animating(step) => step,
            Phase::Pending | Phase::Done => return Tick::Idle,
        };
        let Some(image) = self.snapshot.as_ref() else {
            return Tick::Idle;
        };

        let (width, height) = surface.size();
        surface.clear_rect(0.0, 0.0, width, height);
        surface.draw_image(image);
        for _ in 0..self.strip_count(step) {
            tear_strip(surface, image, width, Strip::random(width, height, rng));
        }

        if step < self.step_to {
            self.phase = Phase::Animating(step + 1);
            Tick::Next {
                delay_ms: rng.range(0.0, self.max_step_delay_ms),
            }
        } else {
            self.phase = Phase::Done;
            self.snapshot = None;
            Tick::Complete
        }
    }
}

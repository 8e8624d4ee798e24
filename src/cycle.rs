//! Panel ring and the conceal/reveal driver.
//!
//! The driver never touches the DOM directly; it talks to a [`Stage`], which
//! owns the panels, scratch surfaces, bitmap capture and timers. Everything
//! runs on one thread, so shared state is `Rc<RefCell<_>>` and every callback
//! is a boxed one-shot task.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::CycleConfig;
use crate::entropy::Entropy;
use crate::transition::{Direction, Surface, Tick, Transition};

/// One-shot deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Circular order over `len` panels, stored as an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    len: usize,
    current: usize,
}

impl Ring {
    /// `None` for an empty ring.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn successor(&self) -> usize {
        (self.current + 1) % self.len
    }

    /// Step forward and return the new current panel.
    pub fn advance(&mut self) -> usize {
        self.current = self.successor();
        self.current
    }
}

/// Host environment the cycler drives.
pub trait Stage: 'static {
    /// Captured panel image.
    type Bitmap: 'static;
    /// Surface layered exactly over one panel.
    type Scratch: Surface<Self::Bitmap> + 'static;
    type Error: fmt::Debug;

    fn panel_count(&self) -> usize;

    /// Put a panel in or out of the layout. Only the cycler calls this.
    fn set_displayed(&self, panel: usize, shown: bool);

    /// Hide a panel while keeping its box, so a scratch surface can stand in.
    fn set_veiled(&self, panel: usize, veiled: bool);

    /// Create a hidden scratch surface over `panel`.
    fn open_scratch(&self, panel: usize) -> Result<Self::Scratch, Self::Error>;

    fn show_scratch(&self, scratch: &Self::Scratch);

    fn close_scratch(&self, scratch: Self::Scratch);

    /// Rasterize `panel`; `done` runs at most once, possibly never.
    fn capture(&self, panel: usize, done: Box<dyn FnOnce(Self::Bitmap)>);

    fn schedule(&self, delay_ms: f64, task: Task);
}

struct Shared<S: Stage, E> {
    stage: S,
    config: CycleConfig,
    rng: RefCell<E>,
    ring: RefCell<Ring>,
}

struct Active<S: Stage> {
    panel: usize,
    transition: Transition<S::Bitmap>,
    scratch: Option<S::Scratch>,
    on_complete: Option<Task>,
}

type Handle<S> = Rc<RefCell<Active<S>>>;

/// Endless conceal, switch, reveal loop around the ring.
pub struct PanelCycler<S: Stage, E> {
    shared: Rc<Shared<S, E>>,
}

impl<S: Stage, E: Entropy + 'static> PanelCycler<S, E> {
    /// `None` when the stage has no panels.
    pub fn new(stage: S, config: CycleConfig, rng: E) -> Option<Self> {
        let ring = Ring::new(stage.panel_count())?;
        Some(Self {
            shared: Rc::new(Shared {
                stage,
                config,
                rng: RefCell::new(rng),
                ring: RefCell::new(ring),
            }),
        })
    }

    pub fn stage(&self) -> &S {
        &self.shared.stage
    }

    pub fn current(&self) -> usize {
        self.shared.ring.borrow().current()
    }

    /// Show only the ring head and start the first dwell.
    pub fn start(&self) {
        let shared = &self.shared;
        let current = self.current();
        for panel in 0..shared.ring.borrow().len() {
            shared.stage.set_displayed(panel, panel == current);
        }
        log::info!("panel cycle started over {} panels", shared.ring.borrow().len());
        cycle(shared);
    }
}

fn cycle<S: Stage, E: Entropy + 'static>(shared: &Rc<Shared<S, E>>) {
    let from = shared.ring.borrow().current();
    shared.stage.set_displayed(from, true);

    let after_conceal: Task = {
        let shared = shared.clone();
        Box::new(move || {
            let to = shared.ring.borrow_mut().advance();
            shared.stage.set_displayed(from, false);
            shared.stage.set_displayed(to, true);
            log::debug!("panel {from} -> {to}");

            let again = shared.clone();
            let reveal = open(&shared, to, Direction::Revealing, Box::new(move || cycle(&again)));
            arm(&shared, &reveal);
        })
    };
    let conceal = open(shared, from, Direction::Concealing, after_conceal);

    // fires whether or not the capture has landed; arm() coalesces
    let s = shared.clone();
    shared
        .stage
        .schedule(shared.config.dwell_ms, Box::new(move || arm(&s, &conceal)));
}

fn open<S: Stage, E: Entropy + 'static>(
    shared: &Rc<Shared<S, E>>,
    panel: usize,
    direction: Direction,
    on_complete: Task,
) -> Handle<S> {
    shared.stage.set_veiled(panel, false);
    let scratch = match shared.stage.open_scratch(panel) {
        Ok(scratch) => Some(scratch),
        Err(e) => {
            log::error!("no scratch surface for panel {panel}: {e:?}");
            None
        }
    };
    let has_scratch = scratch.is_some();
    let handle = Rc::new(RefCell::new(Active {
        panel,
        transition: Transition::new(direction, &shared.config),
        scratch,
        on_complete: Some(on_complete),
    }));

    if has_scratch {
        let s = shared.clone();
        let h = handle.clone();
        shared
            .stage
            .capture(panel, Box::new(move |bitmap| deliver(&s, &h, bitmap)));
    }
    handle
}

fn deliver<S: Stage, E: Entropy + 'static>(
    shared: &Rc<Shared<S, E>>,
    handle: &Handle<S>,
    bitmap: S::Bitmap,
) {
    let start = handle.borrow_mut().transition.deliver(bitmap);
    if start {
        begin(shared, handle);
    }
}

fn arm<S: Stage, E: Entropy + 'static>(shared: &Rc<Shared<S, E>>, handle: &Handle<S>) {
    let (start, skip) = {
        let mut active = handle.borrow_mut();
        (active.transition.arm(), active.scratch.is_none())
    };
    if skip {
        finish(shared, handle);
    } else if start {
        begin(shared, handle);
    }
}

// Step 0 is painted before the scratch covers the panel, so the panel never
// sits behind a blank canvas.
fn begin<S: Stage, E: Entropy + 'static>(shared: &Rc<Shared<S, E>>, handle: &Handle<S>) {
    run(shared, handle);
    let active = handle.borrow();
    if let Some(scratch) = active.scratch.as_ref() {
        shared.stage.show_scratch(scratch);
        shared.stage.set_veiled(active.panel, true);
    }
}

fn run<S: Stage, E: Entropy + 'static>(shared: &Rc<Shared<S, E>>, handle: &Handle<S>) {
    let tick = {
        let mut active = handle.borrow_mut();
        let active = &mut *active;
        match active.scratch.as_mut() {
            Some(scratch) => {
                let mut rng = shared.rng.borrow_mut();
                active.transition.render(scratch, &mut *rng)
            }
            None => Tick::Complete,
        }
    };

    match tick {
        Tick::Next { delay_ms } => {
            let s = shared.clone();
            let h = handle.clone();
            shared.stage.schedule(delay_ms, Box::new(move || run(&s, &h)));
        }
        Tick::Complete => finish(shared, handle),
        Tick::Idle => {}
    }
}

fn finish<S: Stage, E: Entropy + 'static>(shared: &Rc<Shared<S, E>>, handle: &Handle<S>) {
    let on_complete = {
        let mut active = handle.borrow_mut();
        if active.transition.direction() == Direction::Revealing {
            shared.stage.set_veiled(active.panel, false);
        }
        if let Some(scratch) = active.scratch.take() {
            shared.stage.close_scratch(scratch);
        }
        active.on_complete.take()
    };
    if let Some(on_complete) = on_complete {
        on_complete();
    }
}

use crt_fx::config::CycleConfig;
use crt_fx::transition::{tear_strip, Strip};
use crt_fx::{Direction, Phase, Raster, Surface, Tick, Transition};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const LEFT: [u8; 4] = [255, 0, 0, 255];
const RIGHT: [u8; 4] = [0, 0, 255, 255];

/// `w x h` bitmap, red on the left half and blue on the right.
fn halves(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h);
    r.fill(0, 0, w / 2, h, LEFT);
    r.fill(w / 2, 0, w, h, RIGHT);
    r
}

/// Bitmap whose every pixel encodes its own column.
fn columns(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            r.set_pixel(x, y, [x as u8, 0, 0, 255]);
        }
    }
    r
}

fn ready(direction: Direction, snapshot: Raster) -> Transition<Raster> {
    let mut t = Transition::new(direction, &CycleConfig::default());
    assert!(!t.deliver(snapshot));
    assert!(t.arm());
    t
}

#[test]
fn strip_swap_exchanges_halves() {
    let (w, h) = (40, 20);
    let source = halves(w, h);
    let mut surface = source.clone();

    // split at 1/4: the left quarter receives the rightmost quarter
    let strip = Strip {
        x: 10.0,
        y: 5.0,
        h: 4.0,
    };
    tear_strip(&mut surface, &source, w as f64, strip);

    for y in 5..9 {
        for x in 0..10 {
            assert_eq!(surface.pixel(x, y), RIGHT, "({x},{y})");
        }
        // [10, 30) holds source [0, 20): still red
        for x in 10..30 {
            assert_eq!(surface.pixel(x, y), LEFT, "({x},{y})");
        }
        for x in 30..40 {
            assert_eq!(surface.pixel(x, y), RIGHT, "({x},{y})");
        }
    }
    // rows outside the strip are untouched
    assert_eq!(surface.pixel(0, 4), LEFT);
    assert_eq!(surface.pixel(0, 9), LEFT);
}

#[test]
fn strip_swap_maps_columns_exactly() {
    let (w, h) = (32, 8);
    let source = columns(w, h);
    let mut surface = source.clone();
    let x = 7u32;
    tear_strip(
        &mut surface,
        &source,
        w as f64,
        Strip {
            x: x as f64,
            y: 0.0,
            h: h as f64,
        },
    );

    for col in 0..x {
        assert_eq!(surface.pixel(col, 3)[0] as u32, w - x + col);
    }
    for col in x..w {
        assert_eq!(surface.pixel(col, 3)[0] as u32, col - x);
    }
}

#[test]
fn completes_after_step_to_plus_one_ticks() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        for direction in [Direction::Concealing, Direction::Revealing] {
            let mut t = ready(direction, halves(64, 48));
            let mut surface = Raster::new(64, 48);

            let mut ticks = 0;
            let mut completions = 0;
            loop {
                assert_eq!(t.phase(), Phase::Animating(ticks));
                ticks += 1;
                match t.render(&mut surface, &mut rng) {
                    Tick::Next { delay_ms } => assert!((0.0..250.0).contains(&delay_ms)),
                    Tick::Complete => {
                        completions += 1;
                        break;
                    }
                    Tick::Idle => panic!("idle while animating"),
                }
            }
            assert_eq!(ticks, 5);
            assert_eq!(completions, 1);
            assert_eq!(t.phase(), Phase::Done);
            assert!(!t.has_snapshot(), "snapshot is released on completion");
            assert_eq!(t.render(&mut surface, &mut rng), Tick::Idle);
        }
    }
}

#[test]
fn tearing_grows_when_concealing_and_shrinks_when_revealing() {
    let config = CycleConfig::default();
    let conceal: Transition<Raster> = Transition::new(Direction::Concealing, &config);
    let reveal: Transition<Raster> = Transition::new(Direction::Revealing, &config);

    let c: Vec<u32> = (0..=4).map(|s| conceal.strip_count(s)).collect();
    let r: Vec<u32> = (0..=4).map(|s| reveal.strip_count(s)).collect();
    assert_eq!(c, vec![1, 3, 6, 8, 11]);
    assert_eq!(r, vec![11, 8, 6, 3, 1]);
}

#[test]
fn waits_for_both_snapshot_and_go_signal() {
    let config = CycleConfig::default();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut surface = Raster::new(8, 8);

    // armed first, snapshot later
    let mut t = Transition::new(Direction::Concealing, &config);
    assert!(!t.is_armed());
    assert!(!t.arm());
    assert!(t.is_armed());
    assert!(!t.has_snapshot());
    assert_eq!(t.phase(), Phase::Pending);
    assert_eq!(t.render(&mut surface, &mut rng), Tick::Idle);
    assert!(t.deliver(halves(8, 8)));
    assert_eq!(t.phase(), Phase::Animating(0));

    // snapshot first, armed later
    let mut t = Transition::new(Direction::Revealing, &config);
    assert!(!t.deliver(halves(8, 8)));
    assert!(t.has_snapshot());
    assert!(!t.is_armed());
    assert_eq!(t.phase(), Phase::Pending);
    assert!(t.arm());

    // duplicate deliveries and go signals are ignored once running
    assert!(!t.deliver(halves(8, 8)));
    assert!(!t.arm());
    assert_eq!(t.phase(), Phase::Animating(0));
}

#[test]
fn render_starts_from_the_full_snapshot() {
    let mut rng = SmallRng::seed_from_u64(11);
    let source = halves(16, 400);
    let mut t = ready(Direction::Concealing, source.clone());
    let mut surface = Raster::new(16, 400);
    surface.fill(0, 0, 16, 400, [9, 9, 9, 9]);

    t.render(&mut surface, &mut rng);
    // step 0 tears a single strip of at most 32 rows; the rest is the snapshot
    let intact = (0..400)
        .filter(|&y| (0..16).all(|x| surface.pixel(x, y) == source.pixel(x, y)))
        .count();
    assert!(intact >= 400 - 33, "only {intact} rows intact");
    assert!((0..400).all(|y| surface.pixel(0, y) != [9, 9, 9, 9]));
}

#[test]
fn raster_surface_clips_to_bounds() {
    let source = halves(10, 10);
    let mut surface = Raster::new(10, 10);
    surface.clear_rect(-5.0, 8.0, 100.0, 100.0);
    surface.draw_image_region(&source, (5.0, 0.0, 50.0, 50.0), (8.0, 8.0));
    assert_eq!(surface.pixel(8, 8), RIGHT);
    assert_eq!(surface.pixel(9, 9), RIGHT);
    assert_eq!(surface.pixel(7, 7), [0; 4]);
}

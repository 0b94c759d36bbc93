//! Thread generation: path profiles, visual attributes, and the mass-point
//! chain sampled along the neutral path.
//!
//! A profile's three variants share every vertex up to and including the
//! pivot index. Retargeting never touches that zone, which is what keeps the
//! field visually pinned at the pivot column while the tails wander.

use glam::Vec2;
use rand::prelude::*;

use crate::constants::*;
use crate::noise;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug)]
pub struct MassPoint {
    pub pos: Vec2,
    pub prev: Vec2,
    pub acc: Vec2,
}

/// The three destination shapes a thread's target can morph toward.
#[derive(Clone, Debug)]
pub struct PathProfile {
    pub neutral: Vec<Vec2>,
    pub up: Vec<Vec2>,
    pub down: Vec<Vec2>,
}

/// An in-flight morph of the anchor target from one path to another.
#[derive(Clone, Debug)]
pub struct Transition {
    pub from: Vec<Vec2>,
    pub to: Vec<Vec2>,
    pub start_sec: f32,
    pub duration_sec: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Visual {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub stroke_width: f32,
    pub opacity: f32,
}

pub struct Thread {
    pub index: usize,
    pub profile: PathProfile,
    pub points: Vec<MassPoint>,
    pub rest_structural: Vec<f32>,
    pub rest_bend: Vec<f32>,
    /// Flat pixel-space buffer refilled every frame; preallocated at spawn.
    pub draw: Vec<f32>,
    pub visual: Visual,
    pub direction: Direction,
    pub transition: Transition,
    pub ramp_start_sec: f32,
    pub ramp_duration_sec: f32,
    pub wind_ramp_start_sec: f32,
    pub settled_at_sec: Option<f32>,
    pub settle_duration_sec: f32,
}

impl Thread {
    pub fn is_transitioning(&self, now_sec: f32) -> bool {
        self.transition.duration_sec > 0.0
            && now_sec < self.transition.start_sec + self.transition.duration_sec
    }

    /// Raw transition progress in [0, 1]; easing is applied by the integrator.
    pub fn transition_progress(&self, now_sec: f32) -> f32 {
        if self.transition.duration_sec <= 0.0 {
            return 1.0;
        }
        ((now_sec - self.transition.start_sec) / self.transition.duration_sec).clamp(0.0, 1.0)
    }

    /// Settled in its current direction long enough to be retargeted.
    pub fn eligible_for_flip(&self, now_sec: f32) -> bool {
        if self.is_transitioning(now_sec) {
            return false;
        }
        match self.settled_at_sec {
            Some(settled) => now_sec - settled >= self.settle_duration_sec,
            None => false,
        }
    }
}

pub fn duration_range(direction: Direction) -> (f32, f32) {
    match direction {
        Direction::Up => UP_DURATION_RANGE,
        Direction::Down => DOWN_DURATION_RANGE,
    }
}

pub fn settle_range(direction: Direction) -> (f32, f32) {
    match direction {
        Direction::Up => UP_SETTLE_RANGE,
        Direction::Down => DOWN_SETTLE_RANGE,
    }
}

/// Vertical position of a divergent vertex (index past the pivot) for the
/// given variant. `u` is normalized progress past the pivot in (0, 1].
fn divergent_y(variant: Direction, u: f32, pivot_y: f32, exponent: f32) -> f32 {
    let y = match variant {
        Direction::Up => pivot_y + (CEILING_Y - pivot_y) * u.powf(exponent),
        Direction::Down => pivot_y + (FLOOR_Y - pivot_y) * sink_curve(u, exponent),
    };
    y.clamp(0.0, 1.0)
}

/// Gentle wander for the neutral tail; grows with distance from the pivot.
fn neutral_y(u: f32, x: f32, pivot_y: f32, noise_seed: u32) -> f32 {
    let wander = noise::fbm(x * TANGLE_FREQUENCY * 0.6, 4.7, 2, noise_seed ^ 0x517c_c1b7) - 0.5;
    (pivot_y + wander * 2.0 * NEUTRAL_DRIFT * u).clamp(0.0, 1.0)
}

/// Accelerating sink with a soft knee so the tail comes to rest above the
/// floor instead of slamming into it.
fn sink_curve(u: f32, exponent: f32) -> f32 {
    let raw = u.powf(exponent);
    if raw <= DOWN_FLATTEN_KNEE {
        raw
    } else {
        let over = (raw - DOWN_FLATTEN_KNEE) / (1.0 - DOWN_FLATTEN_KNEE);
        DOWN_FLATTEN_KNEE + (1.0 - DOWN_FLATTEN_KNEE) * 0.8 * over * (2.0 - over)
    }
}

fn wobble_scale(variant: Option<Direction>) -> f32 {
    match variant {
        None => WOBBLE_SCALE_NEUTRAL,
        Some(Direction::Up) => WOBBLE_SCALE_UP,
        Some(Direction::Down) => WOBBLE_SCALE_DOWN,
    }
}

/// Build the three path variants for a thread. Vertices at or before the
/// pivot are generated once and shared verbatim between all variants.
pub fn create_path_profile(index: usize, rng: &mut StdRng) -> PathProfile {
    let spread = index as f32 / (THREAD_COUNT - 1).max(1) as f32;
    let baseline_y = (BASELINE_MIN_Y
        + (BASELINE_MAX_Y - BASELINE_MIN_Y) * spread
        + rng.gen_range(-BASELINE_JITTER..BASELINE_JITTER))
    .clamp(BASELINE_MIN_Y, BASELINE_MAX_Y);
    let pivot_y = baseline_y + (0.5 - baseline_y) * PIVOT_CENTER_PULL;

    let wobble: Vec<f32> = (0..SEGMENTS)
        .map(|_| rng.gen_range(-1.0..1.0f32) * WOBBLE_AMPLITUDE)
        .collect();
    let up_exponent = rng.gen_range(UP_EXPONENT_RANGE.0..UP_EXPONENT_RANGE.1);
    let down_exponent = rng.gen_range(DOWN_EXPONENT_RANGE.0..DOWN_EXPONENT_RANGE.1);
    let noise_seed: u32 = rng.gen();

    // Shared convergence zone: baseline eased toward the pivot height, with
    // layered noise that tightens as it approaches the pivot.
    let mut prefix = Vec::with_capacity(PIVOT_INDEX + 1);
    for (i, w) in wobble.iter().enumerate().take(PIVOT_INDEX + 1) {
        let progress = i as f32 / PIVOT_INDEX as f32;
        let eased = progress.powf(CONVERGE_POW);
        let x = (chain_x(i) + w).clamp(X_START, X_END);
        let tangle = noise::fbm(x * TANGLE_FREQUENCY, baseline_y * 7.3, 3, noise_seed) - 0.5;
        let y = baseline_y + (pivot_y - baseline_y) * eased + tangle * TANGLE_AMPLITUDE * (1.0 - eased);
        prefix.push(Vec2::new(x, y.clamp(0.0, 1.0)));
    }

    let tail = |variant: Option<Direction>| -> Vec<Vec2> {
        let mut path = prefix.clone();
        for (i, w) in wobble.iter().enumerate().skip(PIVOT_INDEX + 1) {
            let u = (i - PIVOT_INDEX) as f32 / (SEGMENTS - 1 - PIVOT_INDEX) as f32;
            let x = (chain_x(i) + w * wobble_scale(variant)).clamp(X_START, X_END);
            let y = match variant {
                None => neutral_y(u, x, pivot_y, noise_seed),
                Some(Direction::Up) => divergent_y(Direction::Up, u, pivot_y, up_exponent),
                Some(Direction::Down) => divergent_y(Direction::Down, u, pivot_y, down_exponent),
            };
            path.push(Vec2::new(x, y));
        }
        path
    };

    PathProfile {
        neutral: tail(None),
        up: tail(Some(Direction::Up)),
        down: tail(Some(Direction::Down)),
    }
}

fn randomize_visual(index: usize, rng: &mut StdRng) -> Visual {
    let base = PALETTE[rng.gen_range(0..PALETTE.len())];
    Visual {
        hue: base[0] + rng.gen_range(-HUE_JITTER..HUE_JITTER),
        saturation: (base[1] + rng.gen_range(-SATURATION_JITTER..SATURATION_JITTER)).clamp(0.0, 100.0),
        lightness: (base[2] + rng.gen_range(-LIGHTNESS_JITTER..LIGHTNESS_JITTER)).clamp(0.0, 100.0),
        stroke_width: rng.gen_range(STROKE_WIDTH_RANGE.0..STROKE_WIDTH_RANGE.1),
        opacity: (BASE_OPACITY
            + OPACITY_DEPTH_STEP * index as f32
            + rng.gen_range(-OPACITY_JITTER..OPACITY_JITTER))
        .clamp(0.05, 1.0),
    }
}

/// Spawn one thread at rest along its neutral path, already morphing toward
/// its randomly assigned starting direction.
pub fn spawn_thread(index: usize, now_sec: f32, rng: &mut StdRng) -> Thread {
    let profile = create_path_profile(index, rng);
    let points: Vec<MassPoint> = profile
        .neutral
        .iter()
        .map(|&p| MassPoint {
            pos: p,
            prev: p,
            acc: Vec2::ZERO,
        })
        .collect();

    // The chain's relaxed geometry is the neutral path, whichever variant is
    // currently being chased.
    let rest_structural: Vec<f32> = profile
        .neutral
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .collect();
    let rest_bend: Vec<f32> = (0..SEGMENTS - 2)
        .map(|i| profile.neutral[i].distance(profile.neutral[i + 2]))
        .collect();

    let direction = if rng.gen_bool(SPAWN_UP_PROBABILITY) {
        Direction::Up
    } else {
        Direction::Down
    };
    let (lo, hi) = duration_range(direction);
    let (settle_lo, settle_hi) = settle_range(direction);
    let to = match direction {
        Direction::Up => profile.up.clone(),
        Direction::Down => profile.down.clone(),
    };
    let transition = Transition {
        from: profile.neutral.clone(),
        to,
        start_sec: now_sec,
        duration_sec: rng.gen_range(lo..hi),
    };

    Thread {
        index,
        points,
        rest_structural,
        rest_bend,
        draw: Vec::with_capacity(SEGMENTS * 2),
        visual: randomize_visual(index, rng),
        direction,
        transition,
        ramp_start_sec: now_sec,
        ramp_duration_sec: SPAWN_RAMP_SEC,
        wind_ramp_start_sec: now_sec,
        settled_at_sec: None,
        settle_duration_sec: rng.gen_range(settle_lo..settle_hi),
        profile,
    }
}

/// Derive a fresh target path for a retarget: the live positions at and
/// before the pivot are carried through unchanged, the tail re-derives its
/// curve shape from the current pivot height with fresh exponents.
pub fn retarget_path(thread: &Thread, direction: Direction, rng: &mut StdRng) -> Vec<Vec2> {
    let pivot_y = thread.points[PIVOT_INDEX].pos.y;
    let (exp_lo, exp_hi) = match direction {
        Direction::Up => UP_EXPONENT_RANGE,
        Direction::Down => DOWN_EXPONENT_RANGE,
    };
    let exponent = rng.gen_range(exp_lo..exp_hi);

    let mut to: Vec<Vec2> = thread.points.iter().map(|p| p.pos).collect();
    for (i, slot) in to.iter_mut().enumerate().skip(PIVOT_INDEX + 1) {
        let u = (i - PIVOT_INDEX) as f32 / (SEGMENTS - 1 - PIVOT_INDEX) as f32;
        slot.y = divergent_y(direction, u, pivot_y, exponent);
    }
    to
}

// Simulation tuning constants shared by the core and the web worker.

// Pool and chain shape
pub const THREAD_COUNT: usize = 15;
pub const SEGMENTS: usize = 20; // mass points per thread
pub const PIVOT_INDEX: usize = 13; // shared anchor vertex, roughly 2/3 along the chain

// Normalized space: x spans [X_START, X_END], y spans [0, 1] growing downward
pub const X_START: f32 = 0.04;
pub const X_END: f32 = 0.97;
pub const CEILING_Y: f32 = 0.08; // resting band for risen threads
pub const FLOOR_Y: f32 = 0.93; // resting depth for sunken threads
pub const BASELINE_MIN_Y: f32 = 0.22;
pub const BASELINE_MAX_Y: f32 = 0.78;
pub const BASELINE_JITTER: f32 = 0.07;
pub const PIVOT_CENTER_PULL: f32 = 0.35; // how far pivot height is pulled toward mid-screen

// Path generation
pub const CONVERGE_POW: f32 = 1.7; // power curve toward the pivot in the shared zone
pub const TANGLE_AMPLITUDE: f32 = 0.045;
pub const TANGLE_FREQUENCY: f32 = 3.1;
pub const NEUTRAL_DRIFT: f32 = 0.035;
pub const WOBBLE_AMPLITUDE: f32 = 0.011; // shared lateral wobble, pre-scale
pub const WOBBLE_SCALE_NEUTRAL: f32 = 1.0;
pub const WOBBLE_SCALE_UP: f32 = 0.7;
pub const WOBBLE_SCALE_DOWN: f32 = 0.85;
pub const UP_EXPONENT_RANGE: (f32, f32) = (1.4, 2.6);
pub const DOWN_EXPONENT_RANGE: (f32, f32) = (1.6, 2.9);
pub const DOWN_FLATTEN_KNEE: f32 = 0.72; // where the sink starts decelerating

// Fixed-timestep integration
pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const MAX_SUBSTEPS: u32 = 3; // excess frame time is dropped, never replayed
pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

// Physics
pub const DAMPING: f32 = 0.985;
pub const STRUCT_STIFFNESS: f32 = 0.85;
pub const BEND_STIFFNESS: f32 = 0.35;
pub const ANCHOR_BASE: f32 = 0.055; // fraction moved toward the target path per step
pub const ANCHOR_PRE_PIVOT_BOOST: f32 = 3.2;
pub const ANCHOR_PIVOT_PROXIMITY: f32 = 1.6; // extra pull close behind the pivot
pub const GRAVITY_UP: f32 = 0.05; // normalized units per second^2, toward the ceiling
pub const GRAVITY_DOWN: f32 = 0.09;
pub const WIND_STRENGTH: f32 = 0.06;
pub const BOUNDARY_VELOCITY_RETAIN: f32 = 0.25; // velocity kept after clamping at an edge
pub const DIST_EPSILON: f32 = 1e-6;

// Ramps (seconds)
pub const SPAWN_RAMP_SEC: f32 = 2.4;
pub const FLIP_RAMP_SEC: f32 = 0.9;
pub const WIND_RAMP_SEC: f32 = 1.2;

// Transition durations and settle cooldowns (seconds)
pub const UP_DURATION_RANGE: (f32, f32) = (2.6, 4.4);
pub const DOWN_DURATION_RANGE: (f32, f32) = (1.3, 2.3);
pub const UP_SETTLE_RANGE: (f32, f32) = (4.0, 7.0);
pub const DOWN_SETTLE_RANGE: (f32, f32) = (3.0, 5.0);
pub const SPAWN_UP_PROBABILITY: f64 = 0.18;
pub const RESCUE_PROBABILITY: f64 = 0.7;

// Scheduling cadences
pub const FLIP_INTERVAL_MS: f64 = 1700.0;
pub const WIND_REFRESH_FRAMES: u64 = 12;
pub const REPORT_INTERVAL_MS: f64 = 2000.0;

// Wind field grid
pub const WIND_COLS: usize = 12;
pub const WIND_ROWS: usize = 8;
pub const WIND_OCTAVES: u32 = 3;
pub const WIND_FREQUENCY: f32 = 0.55; // lattice units per grid cell
pub const WIND_DRIFT: f32 = 0.06; // advection rate along x, lattice units per second

// Adaptive quality
pub const TARGET_FRAME_MS: f32 = 16.7;
pub const GLOW_OFF_FRACTION: f32 = 0.85;
pub const GLOW_ON_FRACTION: f32 = 0.55;
pub const GLOW_COOLDOWN_MS: f64 = 4000.0;

// Device-pixel-ratio policy (host side)
pub const DPR_MAX: f64 = 2.0;
pub const DPR_MIN: f64 = 0.75;
pub const DPR_STEP: f64 = 0.25;
pub const DPR_RAISE_COOLDOWN_MS: f64 = 10_000.0;
pub const FALLBACK_AFTER_FLOORED_DOWNS: u8 = 2;

// Palette: hue, saturation, lightness; jittered per thread at spawn
pub const PALETTE: [[f32; 3]; 4] = [
    [205.0, 85.0, 62.0], // blue
    [260.0, 70.0, 66.0], // violet
    [165.0, 60.0, 55.0], // teal
    [330.0, 65.0, 64.0], // magenta
];
pub const HUE_JITTER: f32 = 10.0;
pub const SATURATION_JITTER: f32 = 8.0;
pub const LIGHTNESS_JITTER: f32 = 6.0;
pub const STROKE_WIDTH_RANGE: (f32, f32) = (0.8, 1.9); // pixels
pub const BASE_OPACITY: f32 = 0.34;
pub const OPACITY_DEPTH_STEP: f32 = 0.012; // later threads sit slightly in front
pub const OPACITY_JITTER: f32 = 0.05;

/// Normalized x coordinate of vertex `i` along a chain.
#[inline]
pub fn chain_x(i: usize) -> f32 {
    X_START + (X_END - X_START) * i as f32 / (SEGMENTS - 1) as f32
}

/// Normalized x coordinate of the shared pivot column.
#[inline]
pub fn pivot_x() -> f32 {
    chain_x(PIVOT_INDEX)
}

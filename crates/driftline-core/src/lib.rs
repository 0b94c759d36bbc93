//! Simulation core for the driftline animated background: a pool of
//! constraint-based threads chasing morphing target paths, plus the adaptive
//! quality machinery. Pure Rust with no platform APIs; the web worker crate
//! drives it and strokes the results onto a canvas.

pub mod constants;
pub mod director;
pub mod noise;
pub mod path;
pub mod physics;
pub mod quality;
pub mod sim;
pub mod wind;

pub use path::{Direction, MassPoint, PathProfile, Thread, Transition, Visual};
pub use quality::{
    DprPolicy, FrameSample, HostState, PerfReport, PolicyAction, QualityHint, QualityState,
};
pub use sim::{SimError, Simulation};
pub use wind::WindField;

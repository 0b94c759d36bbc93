//! The simulation context: owns the thread pool, clocks, wind cache, and
//! quality state, with an explicit init -> running -> stop lifecycle so
//! multiple instances can run side by side.
//!
//! Physics runs on an accumulated fixed-timestep clock (`sim_time_sec`);
//! flip and report cadences run on the host's wall-clock timestamps so they
//! stay honest under frame drops.

use rand::prelude::*;
use thiserror::Error;

use crate::constants::*;
use crate::director;
use crate::path::{spawn_thread, Thread};
use crate::physics;
use crate::quality::{FrameSample, PerfReport, QualityState};
use crate::wind::WindField;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    ZeroSurface { width: u32, height: u32 },
    #[error("simulation already initialized")]
    AlreadyRunning,
    #[error("simulation is not running")]
    NotRunning,
}

pub struct Simulation {
    threads: Vec<Thread>,
    wind: WindField,
    rng: StdRng,
    quality: QualityState,
    width: u32,
    height: u32,
    epoch_ms: f64,
    last_frame_ms: f64,
    sim_time_sec: f32,
    accumulator_sec: f32,
    flips_fired: u64,
    frame_index: u64,
    wind_seed: (f32, f32),
    running: bool,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let wind_seed = (rng.gen_range(0.0..64.0), rng.gen_range(0.0..64.0));
        Self {
            threads: Vec::new(),
            wind: WindField::new(),
            rng,
            quality: QualityState::new(0.0),
            width: 0,
            height: 0,
            epoch_ms: 0.0,
            last_frame_ms: 0.0,
            sim_time_sec: 0.0,
            accumulator_sec: 0.0,
            flips_fired: 0,
            frame_index: 0,
            wind_seed,
            running: false,
        }
    }

    /// Spawn the fixed pool and start the clocks.
    pub fn init(&mut self, width: u32, height: u32, now_ms: f64) -> Result<(), SimError> {
        if self.running {
            return Err(SimError::AlreadyRunning);
        }
        if width == 0 || height == 0 {
            return Err(SimError::ZeroSurface { width, height });
        }
        let mut threads = Vec::with_capacity(THREAD_COUNT);
        for i in 0..THREAD_COUNT {
            threads.push(spawn_thread(i, 0.0, &mut self.rng));
        }
        self.threads = threads;
        self.wind
            .regenerate(0.0, self.wind_seed.0, self.wind_seed.1);
        self.quality = QualityState::new(now_ms);
        self.width = width;
        self.height = height;
        self.epoch_ms = now_ms;
        self.last_frame_ms = now_ms;
        self.sim_time_sec = 0.0;
        self.accumulator_sec = 0.0;
        self.flips_fired = 0;
        self.frame_index = 0;
        self.running = true;
        log::info!("[sim] spawned {THREAD_COUNT} threads at {width}x{height}");
        Ok(())
    }

    /// Resize the drawing surface; vertex state is normalized and untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SimError> {
        if !self.running {
            return Err(SimError::NotRunning);
        }
        if width == 0 || height == 0 {
            return Err(SimError::ZeroSurface { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Enter idle; further advances and reports are no-ops.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("[sim] stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn glow(&self) -> bool {
        self.quality.glow()
    }

    /// Flip boundaries processed since init.
    pub fn flip_count(&self) -> u64 {
        self.flips_fired
    }

    /// Per-frame update: wind refresh, due retargets, and the bounded
    /// fixed-timestep physics loop.
    pub fn advance(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        let frame_ms = (now_ms - self.last_frame_ms).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.last_frame_ms = now_ms;
        self.frame_index += 1;

        if self.frame_index == 1 || self.frame_index % WIND_REFRESH_FRAMES == 0 {
            self.wind
                .regenerate(self.sim_time_sec, self.wind_seed.0, self.wind_seed.1);
        }

        // Fire every flip boundary crossed since the epoch; under frame
        // drops this catches up instead of drifting.
        let due = ((now_ms - self.epoch_ms) / FLIP_INTERVAL_MS) as u64;
        while self.flips_fired < due {
            self.flips_fired += 1;
            director::trigger_flip(&mut self.threads, self.sim_time_sec, &mut self.rng);
        }

        self.accumulator_sec += (frame_ms / 1000.0) as f32;
        let mut substeps = 0;
        while self.accumulator_sec >= FIXED_DT && substeps < MAX_SUBSTEPS {
            self.accumulator_sec -= FIXED_DT;
            self.sim_time_sec += FIXED_DT;
            for t in &mut self.threads {
                physics::simulate_thread(t, FIXED_DT, self.sim_time_sec, &self.wind);
            }
            substeps += 1;
        }
        // Time beyond the substep cap is dropped, not replayed.
        if self.accumulator_sec > FIXED_DT {
            self.accumulator_sec = FIXED_DT;
        }
    }

    /// Refill every thread's flat pixel-space draw buffer.
    pub fn prepare_draw(&mut self) {
        let w = self.width as f32;
        let h = self.height as f32;
        for t in &mut self.threads {
            t.draw.clear();
            for p in &t.points {
                t.draw.push(p.pos.x * w);
                t.draw.push(p.pos.y * h);
            }
        }
    }

    /// Record this frame's timings; roughly every two seconds returns the
    /// report to post to the host.
    pub fn record_frame(
        &mut self,
        physics_ms: f32,
        render_ms: f32,
        now_ms: f64,
    ) -> Option<PerfReport> {
        if !self.running {
            return None;
        }
        self.quality.record(FrameSample {
            physics_ms,
            render_ms,
        });
        self.quality.tick(now_ms)
    }
}

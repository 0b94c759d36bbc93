//! Adaptive quality: frame-time sampling with glow hysteresis inside the
//! simulation, and the host-side device-pixel-ratio policy state machine.

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityHint {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameSample {
    pub physics_ms: f32,
    pub render_ms: f32,
}

/// Periodic performance report posted back to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PerfReport {
    pub physics_ms: f32,
    pub render_ms: f32,
    pub total_ms: f32,
    pub fps: f32,
    pub hint: Option<QualityHint>,
}

pub struct QualityState {
    samples: Vec<FrameSample>,
    glow: bool,
    last_glow_change_ms: Option<f64>,
    last_report_ms: f64,
}

impl QualityState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            samples: Vec::with_capacity(256),
            glow: true,
            last_glow_change_ms: None,
            last_report_ms: now_ms,
        }
    }

    pub fn glow(&self) -> bool {
        self.glow
    }

    pub fn record(&mut self, sample: FrameSample) {
        self.samples.push(sample);
    }

    /// Roughly every two seconds: average the window, derive fps and a
    /// quality hint, adjust the glow knob, and clear the window.
    ///
    /// Glow drops immediately when the average runs hot but only returns
    /// after both the cool-frame condition and the cooldown hold; the
    /// asymmetry keeps the knob from oscillating.
    pub fn tick(&mut self, now_ms: f64) -> Option<PerfReport> {
        let interval = now_ms - self.last_report_ms;
        if interval < REPORT_INTERVAL_MS || self.samples.is_empty() {
            return None;
        }

        let count = self.samples.len() as f32;
        let physics_ms = self.samples.iter().map(|s| s.physics_ms).sum::<f32>() / count;
        let render_ms = self.samples.iter().map(|s| s.render_ms).sum::<f32>() / count;
        let total_ms = physics_ms + render_ms;
        let fps = count / (interval as f32 / 1000.0);

        let mut hint = None;
        if total_ms > TARGET_FRAME_MS * GLOW_OFF_FRACTION {
            if self.glow {
                // Shed the cheap knob first; only once glow is already gone
                // does the host get asked to lower resolution.
                self.glow = false;
                self.last_glow_change_ms = Some(now_ms);
                log::debug!("[quality] glow off (avg {total_ms:.2} ms)");
            } else {
                hint = Some(QualityHint::Down);
            }
        } else if total_ms < TARGET_FRAME_MS * GLOW_ON_FRACTION {
            if self.glow {
                hint = Some(QualityHint::Up);
            } else {
                let cooled = self
                    .last_glow_change_ms
                    .map_or(true, |t| now_ms - t >= GLOW_COOLDOWN_MS);
                if cooled {
                    self.glow = true;
                    self.last_glow_change_ms = Some(now_ms);
                    log::debug!("[quality] glow on (avg {total_ms:.2} ms)");
                }
            }
        }

        self.samples.clear();
        self.last_report_ms = now_ms;
        Some(PerfReport {
            physics_ms,
            render_ms,
            total_ms,
            fps,
            hint,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    Running,
    Degraded(u8),
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PolicyAction {
    None,
    Resize { dpr_cap: f64 },
    Fallback,
}

/// Host-side interpretation of quality hints: step the device-pixel-ratio
/// cap down fast and up slow, and give up entirely (static backdrop) after
/// repeated `Down` hints at the floor.
pub struct DprPolicy {
    state: HostState,
    dpr_cap: f64,
    floored_downs: u8,
    last_change_ms: Option<f64>,
}

impl DprPolicy {
    pub fn new() -> Self {
        Self {
            state: HostState::Uninitialized,
            dpr_cap: DPR_MAX,
            floored_downs: 0,
            last_change_ms: None,
        }
    }

    pub fn on_started(&mut self) {
        if self.state == HostState::Uninitialized {
            self.state = HostState::Running;
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn dpr_cap(&self) -> f64 {
        self.dpr_cap
    }

    pub fn on_hint(&mut self, hint: Option<QualityHint>, now_ms: f64) -> PolicyAction {
        let Some(hint) = hint else {
            return PolicyAction::None;
        };
        if self.state == HostState::Fallback {
            return PolicyAction::None;
        }
        match hint {
            QualityHint::Down => {
                if self.dpr_cap > DPR_MIN {
                    self.dpr_cap = (self.dpr_cap - DPR_STEP).max(DPR_MIN);
                    self.floored_downs = 0;
                    self.last_change_ms = Some(now_ms);
                    self.state = HostState::Degraded(self.level());
                    PolicyAction::Resize {
                        dpr_cap: self.dpr_cap,
                    }
                } else {
                    self.floored_downs += 1;
                    if self.floored_downs >= FALLBACK_AFTER_FLOORED_DOWNS {
                        self.state = HostState::Fallback;
                        log::info!("[quality] resolution floor exhausted, static fallback");
                        PolicyAction::Fallback
                    } else {
                        PolicyAction::None
                    }
                }
            }
            QualityHint::Up => {
                // Any recovery signal bleeds off accumulated fallback pressure.
                self.floored_downs = self.floored_downs.saturating_sub(1);
                let cooled = self
                    .last_change_ms
                    .map_or(true, |t| now_ms - t >= DPR_RAISE_COOLDOWN_MS);
                if self.dpr_cap < DPR_MAX && cooled {
                    self.dpr_cap = (self.dpr_cap + DPR_STEP).min(DPR_MAX);
                    self.last_change_ms = Some(now_ms);
                    self.state = if self.dpr_cap >= DPR_MAX {
                        HostState::Running
                    } else {
                        HostState::Degraded(self.level())
                    };
                    PolicyAction::Resize {
                        dpr_cap: self.dpr_cap,
                    }
                } else {
                    PolicyAction::None
                }
            }
        }
    }

    fn level(&self) -> u8 {
        ((DPR_MAX - self.dpr_cap) / DPR_STEP).round() as u8
    }
}

impl Default for DprPolicy {
    fn default() -> Self {
        Self::new()
    }
}

//! Fixed-timestep, constraint-based integrator for one thread's chain.
//!
//! Deterministic given identical thread state, timestep, and clock: all
//! randomness happens at spawn/retarget time, never during stepping.

use glam::Vec2;

use crate::constants::*;
use crate::noise::{ease_in_cubic, ease_in_quad, ease_settle, smoothstep};
use crate::path::{Direction, Thread};
use crate::wind::WindField;

/// Advance one thread by exactly one fixed timestep.
pub fn simulate_thread(thread: &mut Thread, dt: f32, now_sec: f32, wind: &WindField) {
    let progress = thread.transition_progress(now_sec);
    // Rising floats in gradually; falling accelerates.
    let eased = match thread.direction {
        Direction::Up => ease_settle(progress),
        Direction::Down => ease_in_cubic(progress),
    };
    let anchor_ramp = ease_in_quad((now_sec - thread.ramp_start_sec) / thread.ramp_duration_sec);
    let wind_ramp = smoothstep((now_sec - thread.wind_ramp_start_sec) / WIND_RAMP_SEC);
    let gravity = match thread.direction {
        Direction::Up => -GRAVITY_UP,
        Direction::Down => GRAVITY_DOWN,
    };

    // Forces and damped Verlet integration.
    for p in &mut thread.points {
        p.acc += wind.sample(p.pos.x, p.pos.y) * (WIND_STRENGTH * wind_ramp);
        p.acc.y += gravity * anchor_ramp;
        let vel = (p.pos - p.prev) * DAMPING;
        let next = p.pos + vel + p.acc * (dt * dt);
        p.prev = p.pos;
        p.pos = next;
        p.acc = Vec2::ZERO;
    }

    // One relaxation pass: structural, then bend, then anchor pull.
    for i in 0..SEGMENTS - 1 {
        let rest = thread.rest_structural[i];
        relax_pair(&mut thread.points, i, i + 1, rest, STRUCT_STIFFNESS);
    }
    for i in 0..SEGMENTS - 2 {
        let rest = thread.rest_bend[i];
        relax_pair(&mut thread.points, i, i + 2, rest, BEND_STIFFNESS);
    }
    for i in 0..SEGMENTS {
        let target = thread.transition.from[i].lerp(thread.transition.to[i], eased);
        // The convergence zone is held rigid; the tail past the pivot gets
        // progressively looser the farther out it is.
        let weight = if i <= PIVOT_INDEX {
            ANCHOR_PRE_PIVOT_BOOST
        } else {
            let u = (i - PIVOT_INDEX) as f32 / (SEGMENTS - 1 - PIVOT_INDEX) as f32;
            1.0 + ANCHOR_PIVOT_PROXIMITY * (1.0 - u)
        };
        let pull = (ANCHOR_BASE * weight * anchor_ramp).min(1.0);
        let p = &mut thread.points[i];
        p.pos += (target - p.pos) * pull;
    }

    // Keep every vertex in the box; bleed off most of the velocity on the
    // clamped axis so edges do not bounce.
    for p in &mut thread.points {
        let clamped = Vec2::new(p.pos.x.clamp(X_START, X_END), p.pos.y.clamp(0.0, 1.0));
        if clamped.x != p.pos.x {
            p.pos.x = clamped.x;
            p.prev.x = p.pos.x - (p.pos.x - p.prev.x) * BOUNDARY_VELOCITY_RETAIN;
        }
        if clamped.y != p.pos.y {
            p.pos.y = clamped.y;
            p.prev.y = p.pos.y - (p.pos.y - p.prev.y) * BOUNDARY_VELOCITY_RETAIN;
        }
    }

    // A finished transition collapses to a zero-duration pin at its
    // destination so it cannot re-trigger, and the settle clock starts.
    if progress >= 1.0 && thread.transition.duration_sec > 0.0 {
        let to = thread.transition.to.clone();
        thread.transition.from = to;
        thread.transition.start_sec = now_sec;
        thread.transition.duration_sec = 0.0;
        thread.settled_at_sec = Some(now_sec);
    }
}

#[inline]
fn relax_pair(points: &mut [crate::path::MassPoint], i: usize, j: usize, rest: f32, stiffness: f32) {
    let delta = points[j].pos - points[i].pos;
    let dist = delta.length().max(DIST_EPSILON);
    let diff = (dist - rest) / dist;
    let correction = delta * (0.5 * stiffness * diff);
    points[i].pos += correction;
    points[j].pos -= correction;
}

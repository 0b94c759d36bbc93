//! Retarget scheduling: picks one settled thread per flip interval and sends
//! it the other way, so the field never moves in lockstep.

use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::constants::*;
use crate::path::{self, Direction, Thread, Transition};

/// Called once per flip-interval boundary. Prefers rescuing a sunken thread;
/// falls back to the other pool, or skips the cycle when nothing is eligible.
pub fn trigger_flip(threads: &mut [Thread], now_sec: f32, rng: &mut StdRng) {
    let mut ups: SmallVec<[usize; 16]> = SmallVec::new();
    let mut downs: SmallVec<[usize; 16]> = SmallVec::new();
    for (i, t) in threads.iter().enumerate() {
        if !t.eligible_for_flip(now_sec) {
            continue;
        }
        match t.direction {
            Direction::Up => ups.push(i),
            Direction::Down => downs.push(i),
        }
    }

    let (pool, target) = if rng.gen_bool(RESCUE_PROBABILITY) {
        if !downs.is_empty() {
            (&downs, Direction::Up)
        } else {
            (&ups, Direction::Down)
        }
    } else if !ups.is_empty() {
        (&ups, Direction::Down)
    } else {
        (&downs, Direction::Up)
    };
    if pool.is_empty() {
        return;
    }
    let pick = pool[rng.gen_range(0..pool.len())];
    retarget_thread(&mut threads[pick], target, now_sec, rng);
}

/// Snapshot the live chain as the transition origin and start morphing
/// toward a freshly derived path in the new direction. The anchor ramp
/// restarts on the shorter flip duration since the chain is already moving.
pub fn retarget_thread(thread: &mut Thread, direction: Direction, now_sec: f32, rng: &mut StdRng) {
    let from: Vec<Vec2> = thread.points.iter().map(|p| p.pos).collect();
    let to = path::retarget_path(thread, direction, rng);
    let (lo, hi) = path::duration_range(direction);
    let (settle_lo, settle_hi) = path::settle_range(direction);

    thread.transition = Transition {
        from,
        to,
        start_sec: now_sec,
        duration_sec: rng.gen_range(lo..hi),
    };
    thread.direction = direction;
    thread.ramp_start_sec = now_sec;
    thread.ramp_duration_sec = FLIP_RAMP_SEC;
    thread.settled_at_sec = None;
    thread.settle_duration_sec = rng.gen_range(settle_lo..settle_hi);
    log::debug!("[director] retarget thread {} -> {:?}", thread.index, direction);
}

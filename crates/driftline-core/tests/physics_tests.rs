// Integrator properties: determinism, constraint convergence, containment,
// and transition collapse.

use driftline_core::constants::*;
use driftline_core::path::{spawn_thread, Thread};
use driftline_core::physics::simulate_thread;
use driftline_core::wind::WindField;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn step_n(t: &mut Thread, wind: &WindField, n: usize, mut now: f32) -> f32 {
    for _ in 0..n {
        now += FIXED_DT;
        simulate_thread(t, FIXED_DT, now, wind);
    }
    now
}

#[test]
fn stepping_is_deterministic_for_identical_state() {
    // Identical seeds build bit-identical threads; stepping draws no
    // randomness, so the chains must stay bit-identical.
    let mut a = spawn_thread(0, 0.0, &mut rng(42));
    let mut b = spawn_thread(0, 0.0, &mut rng(42));
    let mut wind = WindField::new();
    wind.regenerate(0.0, 1.5, 2.5);

    let mut now_a = 0.0;
    let mut now_b = 0.0;
    for _ in 0..300 {
        now_a = step_n(&mut a, &wind, 1, now_a);
        now_b = step_n(&mut b, &wind, 1, now_b);
    }
    for i in 0..SEGMENTS {
        assert_eq!(a.points[i].pos, b.points[i].pos, "divergence at vertex {i}");
        assert_eq!(a.points[i].prev, b.points[i].prev, "velocity divergence at {i}");
    }
}

#[test]
fn adjacent_distances_converge_to_structural_rest_lengths() {
    let mut t = spawn_thread(3, 0.0, &mut rng(7));
    // Pin the target on the neutral path so the anchor and the constraints
    // agree on the chain's relaxed geometry.
    t.transition.from = t.profile.neutral.clone();
    t.transition.to = t.profile.neutral.clone();
    t.transition.duration_sec = 0.0;
    t.settled_at_sec = Some(0.0);

    // Knock every vertex well off the path.
    for (i, p) in t.points.iter_mut().enumerate() {
        let k = (i * 7 % 5) as f32 / 5.0 - 0.5;
        p.pos += Vec2::new(0.04 * k, -0.06 * k);
        p.prev = p.pos;
    }

    let wind = WindField::new();
    step_n(&mut t, &wind, 600, 0.0);

    for i in 0..SEGMENTS - 1 {
        let dist = t.points[i].pos.distance(t.points[i + 1].pos);
        let rest = t.rest_structural[i];
        assert!(
            (dist - rest).abs() / rest < 0.15,
            "pair {i}: distance {dist} vs rest {rest}"
        );
    }
}

#[test]
fn vertices_never_leave_the_bounding_box() {
    let mut t = spawn_thread(5, 0.0, &mut rng(9));
    // Absurd initial velocities; the box must still hold every step.
    for (i, p) in t.points.iter_mut().enumerate() {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        p.prev = p.pos - Vec2::new(0.5 * sign, -0.8 * sign);
    }
    let mut wind = WindField::new();
    wind.regenerate(3.0, 0.7, 4.2);

    let mut now = 0.0;
    for _ in 0..120 {
        now += FIXED_DT;
        simulate_thread(&mut t, FIXED_DT, now, &wind);
        for (i, p) in t.points.iter().enumerate() {
            assert!(
                (X_START..=X_END).contains(&p.pos.x),
                "vertex {i} escaped horizontally: {}",
                p.pos.x
            );
            assert!(
                (0.0..=1.0).contains(&p.pos.y),
                "vertex {i} escaped vertically: {}",
                p.pos.y
            );
        }
    }
}

#[test]
fn finished_transition_collapses_and_starts_the_settle_clock() {
    let mut t = spawn_thread(1, 0.0, &mut rng(11));
    let wind = WindField::new();
    assert!(t.is_transitioning(0.1));

    // Longest possible duration is under 4.4 s; six seconds finishes it.
    let now = step_n(&mut t, &wind, 360, 0.0);
    assert_eq!(t.transition.duration_sec, 0.0, "transition did not collapse");
    assert_eq!(t.transition.from, t.transition.to, "collapse not pinned");
    assert!(t.settled_at_sec.is_some(), "settle clock never started");
    assert!(!t.is_transitioning(now));

    // A collapsed transition must not re-trigger.
    let settled = t.settled_at_sec;
    step_n(&mut t, &wind, 60, now);
    assert_eq!(t.settled_at_sec, settled);
    assert_eq!(t.transition.duration_sec, 0.0);
}

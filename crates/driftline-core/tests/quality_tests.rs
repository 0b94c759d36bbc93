// Adaptive quality: report cadence, glow hysteresis, and the host-side
// device-pixel-ratio policy.

use driftline_core::constants::*;
use driftline_core::{
    DprPolicy, FrameSample, HostState, PolicyAction, QualityHint, QualityState,
};

fn heavy() -> FrameSample {
    FrameSample {
        physics_ms: 12.0,
        render_ms: 8.0,
    }
}

fn light() -> FrameSample {
    FrameSample {
        physics_ms: 2.0,
        render_ms: 3.0,
    }
}

fn record_window(q: &mut QualityState, sample: FrameSample, count: usize) {
    for _ in 0..count {
        q.record(sample);
    }
}

#[test]
fn no_report_before_the_interval_elapses() {
    let mut q = QualityState::new(0.0);
    record_window(&mut q, light(), 30);
    assert!(q.tick(1000.0).is_none());
    assert!(q.tick(1999.0).is_none());
    assert!(q.tick(2100.0).is_some());
}

#[test]
fn report_averages_the_window_and_clears_it() {
    let mut q = QualityState::new(0.0);
    record_window(&mut q, heavy(), 10);
    let report = q.tick(2100.0).expect("report due");
    assert!((report.physics_ms - 12.0).abs() < 1e-4);
    assert!((report.render_ms - 8.0).abs() < 1e-4);
    assert!((report.total_ms - 20.0).abs() < 1e-4);
    let expected_fps = 10.0 / 2.1;
    assert!((report.fps - expected_fps).abs() < 0.05, "fps {}", report.fps);

    // the window was cleared, so the next interval has nothing to report
    assert!(q.tick(4300.0).is_none());
}

#[test]
fn sustained_overload_disables_glow_once_then_hints_down() {
    let mut q = QualityState::new(0.0);
    assert!(q.glow());

    record_window(&mut q, heavy(), 10);
    let r1 = q.tick(2100.0).unwrap();
    assert!(!q.glow(), "glow should drop on the first hot window");
    assert_eq!(r1.hint, None, "glow is shed before resolution is touched");

    record_window(&mut q, heavy(), 10);
    let r2 = q.tick(4200.0).unwrap();
    assert!(!q.glow());
    assert_eq!(r2.hint, Some(QualityHint::Down));

    record_window(&mut q, heavy(), 10);
    let r3 = q.tick(6300.0).unwrap();
    assert!(!q.glow());
    assert_eq!(r3.hint, Some(QualityHint::Down));
}

#[test]
fn glow_reenable_needs_cool_frames_and_an_elapsed_cooldown() {
    let mut q = QualityState::new(0.0);
    record_window(&mut q, heavy(), 10);
    q.tick(2100.0).unwrap();
    assert!(!q.glow());

    // Frames recovered, but the change cooldown has not elapsed.
    record_window(&mut q, light(), 10);
    let blocked = q.tick(4150.0).unwrap();
    assert!(!q.glow(), "glow re-enabled inside the cooldown window");
    assert_eq!(blocked.hint, None);

    // Cool frames and an elapsed cooldown together re-enable it.
    record_window(&mut q, light(), 10);
    q.tick(6200.0).unwrap();
    assert!(q.glow(), "glow should return once both conditions hold");
}

#[test]
fn comfortable_headroom_with_glow_on_hints_up() {
    let mut q = QualityState::new(0.0);
    record_window(&mut q, light(), 10);
    let report = q.tick(2100.0).unwrap();
    assert!(q.glow());
    assert_eq!(report.hint, Some(QualityHint::Up));
}

#[test]
fn dpr_policy_steps_down_and_reports_the_new_cap() {
    let mut p = DprPolicy::new();
    assert_eq!(p.state(), HostState::Uninitialized);
    p.on_started();
    assert_eq!(p.state(), HostState::Running);

    let action = p.on_hint(Some(QualityHint::Down), 0.0);
    assert_eq!(
        action,
        PolicyAction::Resize {
            dpr_cap: DPR_MAX - DPR_STEP
        }
    );
    assert_eq!(p.state(), HostState::Degraded(1));
    assert_eq!(p.dpr_cap(), DPR_MAX - DPR_STEP);
}

#[test]
fn dpr_policy_falls_back_after_repeated_downs_at_the_floor() {
    let mut p = DprPolicy::new();
    p.on_started();
    let mut now = 0.0;
    while p.dpr_cap() > DPR_MIN {
        now += 2000.0;
        let action = p.on_hint(Some(QualityHint::Down), now);
        assert!(matches!(action, PolicyAction::Resize { .. }));
    }

    // first down at the floor only builds pressure
    assert_eq!(p.on_hint(Some(QualityHint::Down), now + 2000.0), PolicyAction::None);
    assert_ne!(p.state(), HostState::Fallback);
    // the second tips it over
    assert_eq!(
        p.on_hint(Some(QualityHint::Down), now + 4000.0),
        PolicyAction::Fallback
    );
    assert_eq!(p.state(), HostState::Fallback);
    // fallback is terminal
    assert_eq!(p.on_hint(Some(QualityHint::Up), now + 6000.0), PolicyAction::None);
    assert_eq!(p.state(), HostState::Fallback);
}

#[test]
fn dpr_policy_raises_slowly_and_decays_pressure() {
    let mut p = DprPolicy::new();
    p.on_started();
    p.on_hint(Some(QualityHint::Down), 0.0);
    assert_eq!(p.dpr_cap(), DPR_MAX - DPR_STEP);

    // raising is cooldown-gated
    assert_eq!(p.on_hint(Some(QualityHint::Up), 1000.0), PolicyAction::None);
    assert_eq!(p.dpr_cap(), DPR_MAX - DPR_STEP);

    let action = p.on_hint(Some(QualityHint::Up), DPR_RAISE_COOLDOWN_MS + 500.0);
    assert_eq!(action, PolicyAction::Resize { dpr_cap: DPR_MAX });
    assert_eq!(p.state(), HostState::Running);
}

#[test]
fn up_hints_bleed_off_fallback_pressure() {
    let mut p = DprPolicy::new();
    p.on_started();
    let mut now = 0.0;
    while p.dpr_cap() > DPR_MIN {
        now += 2000.0;
        p.on_hint(Some(QualityHint::Down), now);
    }
    // one floored down builds pressure...
    p.on_hint(Some(QualityHint::Down), now + 2000.0);
    // ...an up decays it...
    p.on_hint(Some(QualityHint::Up), now + 4000.0);
    // ...so the next floored down starts over instead of falling back.
    assert_eq!(
        p.on_hint(Some(QualityHint::Down), now + 6000.0),
        PolicyAction::None
    );
    assert_ne!(p.state(), HostState::Fallback);
}

#[test]
fn absent_hints_are_ignored() {
    let mut p = DprPolicy::new();
    p.on_started();
    assert_eq!(p.on_hint(None, 1000.0), PolicyAction::None);
    assert_eq!(p.state(), HostState::Running);
    assert_eq!(p.dpr_cap(), DPR_MAX);
}

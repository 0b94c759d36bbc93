// Wind field: regeneration determinism and bilinear sampling.

use driftline_core::constants::*;
use driftline_core::wind::WindField;

#[test]
fn fresh_field_is_calm() {
    let wind = WindField::new();
    let v = wind.sample(0.4, 0.6);
    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.0);
}

#[test]
fn regeneration_is_deterministic() {
    let mut a = WindField::new();
    let mut b = WindField::new();
    a.regenerate(12.5, 3.0, 7.0);
    b.regenerate(12.5, 3.0, 7.0);
    let mut y = 0.0f32;
    while y <= 1.0 {
        let mut x = 0.0f32;
        while x <= 1.0 {
            assert_eq!(a.sample(x, y), b.sample(x, y), "divergence at ({x},{y})");
            x += 0.09;
        }
        y += 0.11;
    }
}

#[test]
fn samples_interpolate_between_unit_bounded_cells() {
    let mut wind = WindField::new();
    wind.regenerate(4.0, 1.0, 2.0);
    let mut y = 0.0f32;
    while y <= 1.0 {
        let mut x = 0.0f32;
        while x <= 1.0 {
            let v = wind.sample(x, y);
            assert!(v.x.abs() <= 1.0, "x component out of range: {}", v.x);
            assert!(v.y.abs() <= 1.0, "y component out of range: {}", v.y);
            x += 0.07;
        }
        y += 0.13;
    }
}

#[test]
fn sampling_at_grid_nodes_reproduces_the_lattice() {
    let mut wind = WindField::new();
    wind.regenerate(9.0, 0.5, 1.5);
    // The midpoint of two horizontally adjacent nodes must be their mean.
    let x0 = 3.0 / (WIND_COLS - 1) as f32;
    let x1 = 4.0 / (WIND_COLS - 1) as f32;
    let y = 2.0 / (WIND_ROWS - 1) as f32;
    let a = wind.sample(x0, y);
    let b = wind.sample(x1, y);
    let mid = wind.sample((x0 + x1) * 0.5, y);
    let mean = (a + b) * 0.5;
    assert!(
        (mid - mean).length() < 1e-4,
        "midpoint {mid:?} is not the mean of {a:?} and {b:?}"
    );

    // Clamped outside lookups collapse onto the border cells.
    assert_eq!(wind.sample(-1.0, 0.5), wind.sample(0.0, 0.5));
    assert_eq!(wind.sample(2.0, 0.5), wind.sample(1.0, 0.5));
}

//! Deterministic noise and easing primitives.
//!
//! Everything here is a pure function of its numeric inputs; no hidden RNG
//! state is consulted. The physics step depends on that purity for its
//! repeatability, so randomness that should vary between runs must come from
//! the seeded `rand` generators at spawn/retarget time instead.

/// 32-bit integer mix (Wang hash variant).
#[inline]
fn mix(mut h: u32) -> u32 {
    h = (h ^ 61) ^ (h >> 16);
    h = h.wrapping_mul(9);
    h ^= h >> 4;
    h = h.wrapping_mul(0x27d4_eb2d);
    h ^ (h >> 15)
}

/// Hash a lattice point to [0, 1).
#[inline]
pub fn hash01(ix: i32, iy: i32, seed: u32) -> f32 {
    let h = mix(
        (ix as u32)
            .wrapping_mul(0x85eb_ca6b)
            .wrapping_add((iy as u32).wrapping_mul(0xc2b2_ae35))
            .wrapping_add(seed.wrapping_mul(0x9e37_79b9)),
    );
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Bilinearly interpolated value noise in [0, 1].
pub fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    let xf = x.floor();
    let yf = y.floor();
    let ix = xf as i32;
    let iy = yf as i32;
    let tx = smoothstep(x - xf);
    let ty = smoothstep(y - yf);
    let a = hash01(ix, iy, seed);
    let b = hash01(ix + 1, iy, seed);
    let c = hash01(ix, iy + 1, seed);
    let d = hash01(ix + 1, iy + 1, seed);
    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    top + (bottom - top) * ty
}

/// Multi-octave value noise, normalized back to [0, 1].
pub fn fbm(x: f32, y: f32, octaves: u32, seed: u32) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut total = 0.0;
    let mut fx = x;
    let mut fy = y;
    for octave in 0..octaves {
        sum += value_noise(fx, fy, seed.wrapping_add(octave)) * amplitude;
        total += amplitude;
        amplitude *= 0.5;
        fx *= 2.0;
        fy *= 2.0;
    }
    sum / total
}

/// Hermite smoothstep on [0, 1].
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Quadratic ease-in on [0, 1].
#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Cubic ease-in on [0, 1]; an accelerating fall.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Quintic settle curve on [0, 1]; slow departure, brisk middle, gentle
/// arrival. Used for upward transitions so rising reads as a float rather
/// than a launch.
#[inline]
pub fn ease_settle(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
